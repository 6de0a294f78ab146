//! Compiler glue: instruction resolution with argument merging, and type checking.

use log::{debug, trace};

use fhatos_furi::coefficient::{RANGE, RANGE_COEFFICIENT};
use fhatos_furi::{Coefficient, Furi};

use crate::config::CompilerConfig;
use crate::derivation::Derivation;
use crate::obj::{Args, Inst, InstF, OType, Obj, ObjKind, NOOBJ_FURI, OBJ_FURI};
use crate::resolver::{Resolution, Resolver};
use crate::{Error, Oracle};

/// Resolves and type checks against an [`Oracle`].
///
/// With `throw_on_miss` set, misses are errors; otherwise an unresolved instruction comes back
/// unchanged and a failed check is `Ok(false)`.
pub struct Compiler<O: Oracle> {
    oracle: O,
    throw_on_miss: bool,
    derivation: Option<Derivation>,
}

impl<O: Oracle> Compiler<O> {
    pub fn new(oracle: O, throw_on_miss: bool) -> Self {
        Compiler {
            oracle,
            throw_on_miss,
            derivation: None,
        }
    }

    pub fn from_config(oracle: O, config: &CompilerConfig) -> Self {
        Compiler::new(oracle, config.throw_on_miss)
    }

    /// Keep every probe made by later resolutions.
    pub fn with_derivation(mut self) -> Self {
        self.derivation = Some(Derivation::new());
        self
    }

    pub fn derivation(&self) -> Option<&Derivation> {
        self.derivation.as_ref()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn throw_on_miss(&self) -> bool {
        self.throw_on_miss
    }

    fn miss(&self, error: Error) -> Result<bool, Error> {
        if self.throw_on_miss {
            Err(error)
        } else {
            debug!("{}", error);
            Ok(false)
        }
    }

    /// Resolve `inst` for `lhs` and merge the reference's arguments into the definition found.
    pub fn resolve_inst(&mut self, lhs: &Obj, inst: &Obj) -> Result<Obj, Error> {
        let mut log = Derivation::new();
        let resolution = Resolver::new(&self.oracle, &mut log).resolve(lhs, inst);
        let rendered = match &resolution {
            Ok(Resolution::Unresolved) => log.to_string(),
            _ => String::new(),
        };
        if let Some(derivation) = &mut self.derivation {
            derivation.extend(log);
        }
        match resolution? {
            Resolution::Noop => Ok(inst.clone()),
            Resolution::Found(found) => self.merge_inst(inst, &found),
            Resolution::Literal(literal) => Ok(literal),
            Resolution::Unresolved if self.throw_on_miss => {
                let args = match &inst.kind {
                    ObjKind::Inst(i) => i.args.to_string(),
                    _ => String::new(),
                };
                Err(Error::NoResolution {
                    lhs: lhs.vid_or_tid().to_string(),
                    inst: format!("{}{}", inst.vid_or_tid(), args),
                    derivation: rendered,
                })
            }
            Resolution::Unresolved => Ok(inst.clone()),
        }
    }

    /// Combine the provided reference with the resolved definition.
    ///
    /// An instruction definition keeps its operator, body and tid and takes the merged
    /// arguments. A bytecode definition becomes the body of the provided reference.
    pub fn merge_inst(&self, provided: &Obj, resolved: &Obj) -> Result<Obj, Error> {
        let provided_inst = provided.as_inst()?;
        let merged = match &resolved.kind {
            ObjKind::Inst(definition) => {
                let args = merge_args(&provided_inst.args, &definition.args);
                trace!(
                    "merged {} into {}{} => {}",
                    provided_inst.args,
                    definition.op,
                    definition.args,
                    args
                );
                let inst = Inst {
                    op: definition.op.clone(),
                    args,
                    f: definition.f.clone(),
                };
                Obj::inst(resolved.tid.clone(), inst)
            }
            _ => {
                let code = resolved.clone();
                let inst = Inst {
                    op: provided_inst.op.clone(),
                    args: provided_inst.args.clone(),
                    f: Some(InstF::new(move |lhs, _| code.apply(lhs))),
                };
                Obj::inst(provided.tid.clone(), inst)
            }
        };
        Ok(Obj {
            vid: provided.vid.clone(),
            ..merged
        })
    }

    /// Resolve `inst`, check `lhs` against its domain and apply it. A range named in the
    /// definition's tid is checked on the way out.
    pub fn apply_inst(&mut self, lhs: &Obj, inst: &Obj) -> Result<Obj, Error> {
        let resolved = self.resolve_inst(lhs, inst)?;
        if !self.type_check(lhs, &resolved.domain()?)? {
            return Ok(Obj::noobj());
        }
        let out = resolved.apply(lhs)?;
        if resolved.tid.has_query(Some(RANGE)) && !self.type_check(&out, &resolved.range()?)? {
            return Ok(Obj::noobj());
        }
        Ok(out)
    }

    /// The type `obj`'s type declares, or noobj at a self-typed root.
    pub fn super_type(&self, obj: &Obj) -> Obj {
        let tid = obj.tid.no_query();
        let definition = self.oracle.read(&tid);
        if definition.tid.no_query() == tid {
            Obj::noobj()
        } else {
            definition
        }
    }

    /// Fails when `lhs` falls outside `rhs`.
    pub fn coefficient_check(&self, lhs: Coefficient, rhs: Coefficient) -> Result<bool, Error> {
        if (lhs.0 < rhs.0 && lhs.1 < rhs.0) || lhs.1 > rhs.1 {
            return self.miss(Error::CoefficientMismatch { lhs, rhs });
        }
        Ok(true)
    }

    pub fn type_check(&self, value: &Obj, expected: &Furi) -> Result<bool, Error> {
        // code against a signature is accepted unchecked
        if matches!(value.otype(), OType::Type | OType::Inst | OType::Bcode) {
            return Ok(true);
        }
        if value.is_noobj() {
            let range = expected.query_value_list(RANGE_COEFFICIENT);
            if range.first().is_some_and(|low| low.trim() == "0") {
                return Ok(true);
            }
        }
        if let ObjKind::Rec(fields) = &value.kind {
            for (key, field) in fields {
                if let Some(field_type) = key.query().filter(|q| !q.is_empty()) {
                    if !self.type_check(field, &Furi::parse(field_type)?)? {
                        return Ok(false);
                    }
                }
            }
        }
        let expected_id = expected.no_query();
        if expected_id == *OBJ_FURI
            || expected_id == *NOOBJ_FURI
            || expected_id == *value.otype().base_id()
            || expected_id == value.tid.no_query()
        {
            return Ok(true);
        }
        let definition = self.oracle.read(&expected_id);
        if definition.is_noobj() {
            return self.miss(Error::UndefinedType {
                expected: expected.to_string(),
            });
        }
        if !self.coefficient_check(value.range_coefficient()?, definition.domain_coefficient()?)? {
            return Ok(false);
        }
        let mut reasons = Vec::new();
        if value.matches_def(&definition, &mut reasons) {
            return Ok(true);
        }
        self.miss(Error::TypeCheckFailure {
            value: value.to_string(),
            expected: expected.to_string(),
            definition: definition.to_string(),
            reasons,
        })
    }
}

/// Merge provided arguments into formal ones: by name, then by position, then the default.
pub fn merge_args(provided: &Args, formal: &Args) -> Args {
    if formal.is_empty() {
        return provided.clone();
    }
    let positional = provided.is_indexed();
    let mut merged = Args::new();
    for (counter, (name, default)) in formal.iter().enumerate() {
        let value = match provided.get(name) {
            Some(value) => value.clone(),
            None => match provided.arg(counter) {
                Some(value) if positional => value.clone(),
                _ => default_value(default),
            },
        };
        merged.set(name, value);
    }
    merged
}

fn default_value(default: &Obj) -> Obj {
    match &default.kind {
        ObjKind::Inst(inst) => inst.args.arg(0).cloned().unwrap_or_else(Obj::noobj),
        _ => default.clone(),
    }
}
