//! Cardinality coefficients and the domain/range signature carried in a fURI query.

use crate::error::FuriError;
use crate::furi::Furi;

/// An inclusive `(low, high)` cardinality range. `i32::MIN`/`i32::MAX` mean unbounded.
pub type Coefficient = (i32, i32);

/// Query key of the domain type.
pub const DOMAIN: &str = "dom";
/// Query key of the domain coefficient.
pub const DOMAIN_COEFFICIENT: &str = "dc";
/// Query key of the range type.
pub const RANGE: &str = "rng";
/// Query key of the range coefficient.
pub const RANGE_COEFFICIENT: &str = "rc";
/// The type every object belongs to.
pub const OBJ_TYPE: &str = "/mmadt/obj";

/// Render a coefficient in its canonical text form.
///
/// ```rust
/// use fhatos_furi::coefficient::encode;
///
/// assert_eq!(encode((2, 2)), "2");
/// assert_eq!(encode((0, i32::MAX)), "0,");
/// assert_eq!(encode((i32::MIN, 4)), ",4");
/// assert_eq!(encode((1, 3)), "1,3");
/// ```
pub fn encode((low, high): Coefficient) -> String {
    if low == i32::MIN {
        if high == i32::MAX {
            ",".to_string()
        } else {
            format!(",{}", high)
        }
    } else if high == i32::MAX {
        format!("{},", low)
    } else if low == high {
        low.to_string()
    } else {
        format!("{},{}", low, high)
    }
}

fn bound(text: &str, whole: &str) -> Result<i32, FuriError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| FuriError::InvalidCoefficient {
            coefficient: whole.to_string(),
        })
}

/// Parse coefficient text (the inverse of [`encode`]).
pub fn decode(text: &str) -> Result<Coefficient, FuriError> {
    if text == "," {
        return Ok((i32::MIN, i32::MAX));
    }
    if let Some(low) = text.strip_suffix(',') {
        return Ok((bound(low, text)?, i32::MAX));
    }
    if let Some(high) = text.strip_prefix(',') {
        return Ok((i32::MIN, bound(high, text)?));
    }
    match text.split_once(',') {
        None => {
            let exact = bound(text, text)?;
            Ok((exact, exact))
        }
        Some((low, high)) => Ok((bound(low, text)?, bound(high, text)?)),
    }
}

/// The typed signature of an instruction: `domain{domain_coefficient} => range{range_coefficient}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainRange {
    pub domain: Furi,
    pub domain_coefficient: Coefficient,
    pub range: Furi,
    pub range_coefficient: Coefficient,
}

impl DomainRange {
    /// Read the signature from `furi`'s query. The domain defaults to `/mmadt/obj`, the range to
    /// the query-less fURI and both coefficients to `(1,1)`.
    pub fn from_furi(furi: &Furi) -> Result<DomainRange, FuriError> {
        let domain = match furi.query_value(DOMAIN) {
            Some(text) if !text.is_empty() => Furi::parse(&text)?,
            _ => Furi::parse(OBJ_TYPE)?,
        };
        let range = match furi.query_value(RANGE) {
            Some(text) if !text.is_empty() => Furi::parse(&text)?,
            _ => furi.no_query(),
        };
        Ok(DomainRange {
            domain,
            domain_coefficient: pair(furi, DOMAIN_COEFFICIENT)?,
            range,
            range_coefficient: pair(furi, RANGE_COEFFICIENT)?,
        })
    }
}

fn pair(furi: &Furi, key: &str) -> Result<Coefficient, FuriError> {
    match furi.query_value(key) {
        Some(text) if !text.is_empty() => {
            let bounds = furi.query_value_list(key);
            match bounds.as_slice() {
                [low, high] => Ok((bound(low, &text)?, bound(high, &text)?)),
                [exact] => {
                    let exact = bound(exact, &text)?;
                    Ok((exact, exact))
                }
                _ => Err(FuriError::InvalidCoefficient { coefficient: text }),
            }
        }
        _ => Ok((1, 1)),
    }
}

impl Furi {
    /// The coefficient as a range, `(1,1)` when absent.
    pub fn coefficients(&self) -> Result<Coefficient, FuriError> {
        match self.coefficient() {
            None => Ok((1, 1)),
            Some(text) => decode(text),
        }
    }

    /// Encode `(low, high)` as this fURI's coefficient.
    pub fn with_coefficients(&self, low: i32, high: i32) -> Furi {
        self.with_coefficient(&encode((low, high)))
    }

    /// Write the `dom`/`dc`/`rng`/`rc` query keys, replacing any existing query.
    pub fn with_dom_rng(
        &self,
        domain: &Furi,
        domain_coefficient: Coefficient,
        range: &Furi,
        range_coefficient: Coefficient,
    ) -> Furi {
        self.with_query_pairs(&[
            (DOMAIN, domain.no_query().to_string()),
            (
                DOMAIN_COEFFICIENT,
                format!("{},{}", domain_coefficient.0, domain_coefficient.1),
            ),
            (RANGE, range.no_query().to_string()),
            (
                RANGE_COEFFICIENT,
                format!("{},{}", range_coefficient.0, range_coefficient.1),
            ),
        ])
    }

    /// Read the domain/range signature back from the query.
    pub fn dom_rng(&self) -> Result<DomainRange, FuriError> {
        DomainRange::from_furi(self)
    }
}
