//! The fURI text parser.
//!
//! A single left-to-right scan over the input, driven by the part of the fURI currently being
//! accumulated. In priority order the scanner recognizes: the authority marker `//`, the component
//! separator `::`, the `:` separator, `@`, `/`, the relative marker `..`, the coefficient marker
//! `$` and the query marker `?`. Characters outside printable ASCII are skipped.

use std::mem::take;

use crate::error::FuriError;
use crate::furi::{Furi, COMPONENT_SEPARATOR};
use crate::string_helper;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Scheme,
    User,
    Password,
    Host,
    Port,
    Path,
    Coefficient,
    Query,
}

fn parse_port(token: &str) -> Result<u16, FuriError> {
    if !string_helper::is_integer(token) {
        return Err(FuriError::InvalidPort {
            token: token.to_string(),
        });
    }
    token.parse::<u16>().map_err(|_| FuriError::InvalidPort {
        token: token.to_string(),
    })
}

pub(crate) fn parse(text: &str) -> Result<Furi, FuriError> {
    let mut furi = Furi::default();
    if text.is_empty() {
        return Ok(furi);
    }
    if text == "//" {
        furi.host = Some(String::new());
        return Ok(furi);
    }
    let chars: Vec<char> = text
        .chars()
        .filter(|c| string_helper::is_furi_char(*c))
        .collect();
    let has_user_info = chars.contains(&'@');
    let mut found_authority = false;
    let mut part = Part::Scheme;
    let mut token = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        i += 1;
        let is_last = i == chars.len();
        let authority_before = found_authority;
        if !found_authority && c == '/' && next == Some('/') {
            found_authority = true;
            if matches!(part, Part::Scheme | Part::User) {
                part = Part::User;
                i += 1;
            }
        } else if c == ':' && next == Some(':') {
            i += 1;
            if !token.is_empty() {
                furi.segments.push(take(&mut token));
            }
            furi.segments.push(COMPONENT_SEPARATOR.to_string());
            furi.spostfix = false;
            if chars.get(i) == Some(&'/') {
                i += 1;
            }
            part = Part::Path;
        } else if c == ':' {
            match part {
                Part::Scheme => {
                    if token.is_empty() {
                        token.push(c);
                    } else {
                        furi.scheme = Some(take(&mut token));
                    }
                    part = Part::User;
                }
                Part::User => {
                    if has_user_info {
                        furi.user = Some(take(&mut token));
                        part = Part::Password;
                    } else {
                        furi.host = Some(take(&mut token));
                        part = Part::Port;
                    }
                }
                Part::Host => {
                    furi.host = Some(take(&mut token));
                    part = Part::Port;
                }
                _ => token.push(c),
            }
        } else if c == '@' {
            if matches!(part, Part::User | Part::Password) {
                if furi.user.is_some() {
                    furi.password = Some(take(&mut token));
                } else {
                    furi.user = Some(take(&mut token));
                }
                part = Part::Host;
            } else {
                token.push(c);
            }
        } else if c == '/' {
            match part {
                Part::Port => {
                    furi.port = parse_port(&token)?;
                    token.clear();
                    furi.sprefix = true;
                    part = Part::Path;
                }
                Part::Scheme | Part::Host | Part::User | Part::Password => {
                    if found_authority {
                        furi.host = Some(take(&mut token));
                        furi.sprefix = true;
                    } else if token.is_empty() {
                        furi.sprefix = true;
                    } else {
                        furi.segments.push(take(&mut token));
                    }
                    part = Part::Path;
                }
                Part::Path => {
                    furi.segments.push(take(&mut token));
                    furi.spostfix = true;
                }
                Part::Coefficient | Part::Query => token.push(c),
            }
        } else if part == Part::Path && c == '.' && next == Some('.') {
            i += 1;
            furi.spostfix = chars.get(i) == Some(&'/');
            if furi.spostfix {
                i += 1;
            }
            match furi.segments.last() {
                Some(last) if !last.starts_with('.') => {
                    furi.segments.pop();
                }
                _ => furi.segments.push("..".to_string()),
            }
        } else if c == '$' {
            match part {
                Part::Path | Part::Scheme => {
                    if !token.is_empty() {
                        furi.segments.push(take(&mut token));
                    }
                    part = Part::Coefficient;
                }
                Part::Host | Part::User => {
                    furi.host = Some(take(&mut token));
                    part = Part::Coefficient;
                }
                _ => token.push(c),
            }
        } else if c == '?' {
            match part {
                Part::Coefficient => {
                    if !token.is_empty() {
                        furi.coefficient = Some(take(&mut token));
                    }
                    part = Part::Query;
                }
                Part::Path | Part::Scheme => {
                    if !token.is_empty() {
                        furi.segments.push(take(&mut token));
                    }
                    part = Part::Query;
                }
                Part::Host | Part::User => {
                    furi.host = Some(take(&mut token));
                    part = Part::Query;
                }
                _ => token.push(c),
            }
        } else {
            if !matches!(part, Part::Query | Part::Coefficient) {
                furi.spostfix = false;
            }
            token.push(c);
        }
        if c == '/' && is_last && !authority_before {
            furi.spostfix = true;
        }
    }
    if !token.is_empty() {
        flush(&mut furi, part, found_authority, token)?;
    }
    validate(&furi)?;
    Ok(furi)
}

fn flush(furi: &mut Furi, part: Part, found_authority: bool, token: String) -> Result<(), FuriError> {
    let pathlike = matches!(part, Part::Path | Part::Scheme);
    let trailing = matches!(part, Part::Coefficient | Part::Query);
    if (!found_authority && !trailing) || pathlike {
        furi.segments.push(token);
    } else {
        match part {
            Part::Host | Part::User => furi.host = Some(token),
            Part::Port => furi.port = parse_port(&token)?,
            Part::Coefficient => furi.coefficient = Some(token),
            Part::Query => furi.query = Some(token),
            _ => {}
        }
    }
    Ok(())
}

fn validate(furi: &Furi) -> Result<(), FuriError> {
    let len = furi.segments.len();
    for (i, segment) in furi.segments.iter().enumerate() {
        if segment.starts_with('#') && i != len - 1 {
            return Err(FuriError::MisplacedWildcard {
                path: furi.path(),
            });
        }
        if i == len - 1 && !furi.spostfix && (segment.ends_with('_') || segment.ends_with('=')) {
            return Err(FuriError::ReservedTerminalChar {
                name: furi.name().to_string(),
            });
        }
    }
    Ok(())
}
