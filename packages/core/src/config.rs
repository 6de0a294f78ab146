//! Serde configuration for the router and compiler.
//!
//! A configuration file is JSON:
//! ```json
//! {
//!   "router": {
//!     "auto_prefixes": ["/mmadt/"],
//!     "entries": [
//!       {"id": "/nat", "obj": {"type": "type", "kind": "int", "tid": "/mmadt/int"}},
//!       {"id": "/mmadt/int::plus", "obj": {"type": "inst", "op": "plus", "body": "identity"}}
//!     ]
//!   },
//!   "compiler": {"throw_on_miss": true}
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use fhatos_furi::{furi, Furi};

use crate::obj::{Args, Inst, InstF, OType, Obj};
use crate::Error;

/// A native instruction body that can be named in configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    /// Returns the lhs.
    Identity,
    /// Returns noobj.
    Noobj,
}

impl Builtin {
    pub fn function(&self) -> InstF {
        match self {
            Builtin::Identity => InstF::new(|lhs, _| Ok(lhs.clone())),
            Builtin::Noobj => InstF::new(|_, _| Ok(Obj::noobj())),
        }
    }
}

/// A named instruction argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgConfig {
    pub name: String,
    pub value: ObjConfig,
}

/// An object as written in configuration. `tid` defaults to the variant's base type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjConfig {
    Noobj {
        #[serde(default)]
        tid: Option<Furi>,
    },
    Bool {
        value: bool,
        #[serde(default)]
        tid: Option<Furi>,
    },
    Int {
        value: i64,
        #[serde(default)]
        tid: Option<Furi>,
    },
    Real {
        value: f64,
        #[serde(default)]
        tid: Option<Furi>,
    },
    Str {
        value: String,
        #[serde(default)]
        tid: Option<Furi>,
    },
    Uri {
        value: Furi,
        #[serde(default)]
        tid: Option<Furi>,
    },
    /// A kind prototype, e.g. the definition of a type refining `int`.
    Type {
        kind: OType,
        #[serde(default)]
        tid: Option<Furi>,
    },
    Rec {
        #[serde(default)]
        fields: BTreeMap<String, ObjConfig>,
        #[serde(default)]
        tid: Option<Furi>,
    },
    Lst {
        #[serde(default)]
        items: Vec<ObjConfig>,
        #[serde(default)]
        tid: Option<Furi>,
    },
    /// An instruction. Without a `body` it is a stub. `tid` defaults to the operator name.
    Inst {
        op: String,
        #[serde(default)]
        args: Vec<ArgConfig>,
        #[serde(default)]
        body: Option<Builtin>,
        #[serde(default)]
        tid: Option<Furi>,
    },
}

fn typed(obj: Obj, tid: &Option<Furi>) -> Obj {
    match tid {
        Some(tid) => obj.with_tid(tid.clone()),
        None => obj,
    }
}

impl ObjConfig {
    pub fn to_obj(&self) -> Result<Obj, Error> {
        let obj = match self {
            ObjConfig::Noobj { tid } => typed(Obj::noobj(), tid),
            ObjConfig::Bool { value, tid } => typed(Obj::bool(*value), tid),
            ObjConfig::Int { value, tid } => typed(Obj::int(*value), tid),
            ObjConfig::Real { value, tid } => typed(Obj::real(*value), tid),
            ObjConfig::Str { value, tid } => typed(Obj::str(value), tid),
            ObjConfig::Uri { value, tid } => typed(Obj::uri(value.clone()), tid),
            ObjConfig::Type { kind, tid } => typed(Obj::type_of(*kind), tid),
            ObjConfig::Rec { fields, tid } => {
                let fields = fields
                    .iter()
                    .map(|(k, v)| -> Result<(Furi, Obj), Error> {
                        Ok((Furi::parse(k)?, v.to_obj()?))
                    })
                    .collect::<Result<BTreeMap<_, _>, Error>>()?;
                typed(Obj::rec(fields), tid)
            }
            ObjConfig::Lst { items, tid } => {
                let items = items
                    .iter()
                    .map(ObjConfig::to_obj)
                    .collect::<Result<Vec<_>, Error>>()?;
                typed(Obj::lst(items), tid)
            }
            ObjConfig::Inst {
                op,
                args,
                body,
                tid,
            } => {
                let args = args
                    .iter()
                    .map(|a| -> Result<(String, Obj), Error> {
                        Ok((a.name.clone(), a.value.to_obj()?))
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                let mut inst = Inst::new(op, Args::named(args));
                if let Some(body) = body {
                    inst = inst.with_f(body.function());
                }
                let tid = match tid {
                    Some(tid) => tid.clone(),
                    None => Furi::parse(op)?,
                };
                Obj::inst(tid, inst)
            }
        };
        Ok(obj)
    }
}

/// An object to write at boot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: Furi,
    pub obj: ObjConfig,
}

fn default_auto_prefixes() -> Vec<Furi> {
    vec![furi!("/mmadt/")]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    #[serde(default = "default_auto_prefixes")]
    pub auto_prefixes: Vec<Furi>,
    /// Write the `/mmadt/<kind>` prototypes before the entries.
    #[serde(default = "default_true")]
    pub base_types: bool,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            auto_prefixes: default_auto_prefixes(),
            base_types: true,
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompilerConfig {
    #[serde(default = "default_true")]
    pub throw_on_miss: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            throw_on_miss: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Config, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        log::debug!("Reading config {}...", path.display());
        let json = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        Config::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.router.auto_prefixes, vec![furi!("/mmadt/")]);
        assert!(config.router.base_types);
        assert!(config.compiler.throw_on_miss);
    }

    #[test]
    fn tagged_objects() {
        let obj: ObjConfig = serde_json::from_str(r#"{"type": "int", "value": 5}"#).unwrap();
        assert_eq!(obj.to_obj().unwrap(), Obj::int(5));

        let obj: ObjConfig =
            serde_json::from_str(r#"{"type": "type", "kind": "int", "tid": "/mmadt/obj"}"#)
                .unwrap();
        assert_eq!(
            obj.to_obj().unwrap(),
            Obj::type_of(OType::Int).with_tid(furi!("/mmadt/obj"))
        );

        let obj: ObjConfig = serde_json::from_str(
            r#"{"type": "rec", "fields": {"name": {"type": "type", "kind": "str"}}}"#,
        )
        .unwrap();
        let rec = obj.to_obj().unwrap();
        assert_eq!(rec.rec_get("name"), Some(&Obj::type_of(OType::Str)));
    }

    #[test]
    fn insts_default_their_tid_to_the_op() {
        let obj: ObjConfig = serde_json::from_str(
            r#"{"type": "inst", "op": "plus", "args": [{"name": "rhs", "value": {"type": "int", "value": 0}}]}"#,
        )
        .unwrap();
        let inst = obj.to_obj().unwrap();
        assert_eq!(inst.tid, furi!("plus"));
        let body = inst.as_inst().unwrap();
        assert!(body.is_stub());
        assert_eq!(body.args.get("rhs"), Some(&Obj::int(0)));

        let obj: ObjConfig =
            serde_json::from_str(r#"{"type": "inst", "op": "id", "body": "identity"}"#).unwrap();
        let inst = obj.to_obj().unwrap();
        assert_eq!(inst.apply(&Obj::int(3)), Ok(Obj::int(3)));
    }

    #[test]
    fn bad_ids_are_config_errors() {
        assert!(Config::from_json_str(r#"{"router": {"auto_prefixes": ["/a/#/b"]}}"#).is_err());
        assert!(matches!(
            Config::from_json_str("not json"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fhatos.json");
        std::fs::write(
            &path,
            r#"{"router": {"entries": [{"id": "/x", "obj": {"type": "str", "value": "hi"}}]},
                "compiler": {"throw_on_miss": false}}"#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.router.entries.len(), 1);
        assert_eq!(config.router.entries[0].id, furi!("/x"));
        assert!(!config.compiler.throw_on_miss);
        assert!(Config::load(dir.path().join("missing.json")).is_err());
    }
}
