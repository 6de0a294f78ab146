//! The object model.
//!
//! Every value in the system is an [`Obj`]: a closed sum of variants ([`ObjKind`]) tagged with a
//! type id (`tid`) and, once stored, a value id (`vid`). Instructions ([`Inst`]) are objects too,
//! which is what lets the router store them under fURIs and the resolver find them there.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use fhatos_furi::{furi, Coefficient, DomainRange, Furi};

use crate::Error;

/// The runtime kind of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OType {
    Obj,
    Noobj,
    Bool,
    Int,
    Real,
    Str,
    Uri,
    Lst,
    Rec,
    Inst,
    Bcode,
    Type,
    Error,
}

impl OType {
    pub const ALL: [OType; 13] = [
        OType::Obj,
        OType::Noobj,
        OType::Bool,
        OType::Int,
        OType::Real,
        OType::Str,
        OType::Uri,
        OType::Lst,
        OType::Rec,
        OType::Inst,
        OType::Bcode,
        OType::Type,
        OType::Error,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OType::Obj => "obj",
            OType::Noobj => "noobj",
            OType::Bool => "bool",
            OType::Int => "int",
            OType::Real => "real",
            OType::Str => "str",
            OType::Uri => "uri",
            OType::Lst => "lst",
            OType::Rec => "rec",
            OType::Inst => "inst",
            OType::Bcode => "bcode",
            OType::Type => "type",
            OType::Error => "error",
        }
    }

    /// The `/mmadt/<name>` id of the kind.
    pub fn base_id(&self) -> &'static Furi {
        &BASE_IDS[self]
    }

    /// The kind whose base id is `id`, ignoring any query.
    pub fn from_base_id(id: &Furi) -> Option<OType> {
        let id = id.no_query();
        OType::ALL.into_iter().find(|o| *o.base_id() == id)
    }
}

lazy_static! {
    static ref BASE_IDS: BTreeMap<OType, Furi> = OType::ALL
        .into_iter()
        .map(|o| (o, furi!(&format!("/mmadt/{}", o.name()))))
        .collect();
    /// The root of the type hierarchy.
    pub static ref OBJ_FURI: Furi = OType::Obj.base_id().clone();
    /// The type of the absent object.
    pub static ref NOOBJ_FURI: Furi = OType::Noobj.base_id().clone();
}

type Function = dyn Fn(&Obj, &Args) -> Result<Obj, Error> + Send + Sync;

/// The native body of an instruction.
#[derive(Clone)]
pub struct InstF(Arc<Function>);

impl InstF {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Obj, &Args) -> Result<Obj, Error> + Send + Sync + 'static,
    {
        InstF(Arc::new(f))
    }

    pub fn call(&self, lhs: &Obj, args: &Args) -> Result<Obj, Error> {
        (self.0)(lhs, args)
    }
}

impl fmt::Debug for InstF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InstF(..)")
    }
}

impl PartialEq for InstF {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Ordered, named instruction arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args(Vec<(String, Obj)>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments keyed `"0"`, `"1"`, ...
    pub fn indexed(values: Vec<Obj>) -> Self {
        Args(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        )
    }

    pub fn named<K: Into<String>>(pairs: Vec<(K, Obj)>) -> Self {
        Args(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Set `name`, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: Obj) {
        match self.0.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Obj> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// The argument at `index`, regardless of its name.
    pub fn arg(&self, index: usize) -> Option<&Obj> {
        self.0.get(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty with keys `"0"`, `"1"`, ... in order.
    pub fn is_indexed(&self) -> bool {
        !self.0.is_empty() && self.0.iter().enumerate().all(|(i, (k, _))| *k == i.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Obj)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indexed = self.is_indexed();
        let rendered = self
            .0
            .iter()
            .map(|(k, v)| {
                if indexed {
                    v.to_string()
                } else {
                    format!("{}=>{}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "({})", rendered)
    }
}

/// An instruction: an operator, its arguments and, unless it is a stub, a native body.
#[derive(Clone, Debug, PartialEq)]
pub struct Inst {
    pub op: String,
    pub args: Args,
    pub f: Option<InstF>,
}

impl Inst {
    /// A stub: a reference that still has to be resolved.
    pub fn new(op: &str, args: Args) -> Self {
        Inst {
            op: op.to_string(),
            args,
            f: None,
        }
    }

    pub fn with_f(mut self, f: InstF) -> Self {
        self.f = Some(f);
        self
    }

    pub fn is_stub(&self) -> bool {
        self.f.is_none()
    }

    pub fn apply(&self, lhs: &Obj) -> Result<Obj, Error> {
        match &self.f {
            Some(f) => f.call(lhs, &self.args),
            None => Err(Error::WrongVariant {
                expected: "invokable inst",
                found: self.op.clone(),
            }),
        }
    }
}

/// The payload of an [`Obj`].
#[derive(Clone, Debug, PartialEq)]
pub enum ObjKind {
    Noobj,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    Uri(Furi),
    Lst(Vec<Obj>),
    Rec(BTreeMap<Furi, Obj>),
    Inst(Inst),
    Bcode(Vec<Inst>),
    /// A kind prototype: matches every value of that kind.
    Type(OType),
    Error(String),
}

/// A typed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Obj {
    pub kind: ObjKind,
    pub tid: Furi,
    pub vid: Option<Furi>,
}

impl Obj {
    fn of(kind: ObjKind, otype: OType) -> Self {
        Obj {
            kind,
            tid: otype.base_id().clone(),
            vid: None,
        }
    }

    pub fn noobj() -> Self {
        Obj::of(ObjKind::Noobj, OType::Noobj)
    }

    pub fn bool(value: bool) -> Self {
        Obj::of(ObjKind::Bool(value), OType::Bool)
    }

    pub fn int(value: i64) -> Self {
        Obj::of(ObjKind::Int(value), OType::Int)
    }

    pub fn real(value: f64) -> Self {
        Obj::of(ObjKind::Real(value), OType::Real)
    }

    pub fn str(value: &str) -> Self {
        Obj::of(ObjKind::Str(value.to_string()), OType::Str)
    }

    pub fn uri(value: Furi) -> Self {
        Obj::of(ObjKind::Uri(value), OType::Uri)
    }

    pub fn lst(values: Vec<Obj>) -> Self {
        Obj::of(ObjKind::Lst(values), OType::Lst)
    }

    pub fn rec(fields: BTreeMap<Furi, Obj>) -> Self {
        Obj::of(ObjKind::Rec(fields), OType::Rec)
    }

    /// An instruction object. `tid` names the operation (`plus`, `/mmadt/int/::/plus`, ...).
    pub fn inst(tid: Furi, inst: Inst) -> Self {
        Obj {
            kind: ObjKind::Inst(inst),
            tid,
            vid: None,
        }
    }

    pub fn bcode(insts: Vec<Inst>) -> Self {
        Obj::of(ObjKind::Bcode(insts), OType::Bcode)
    }

    /// The prototype of `otype`, typed by that kind's base id.
    pub fn type_of(otype: OType) -> Self {
        Obj {
            kind: ObjKind::Type(otype),
            tid: otype.base_id().clone(),
            vid: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Obj::of(ObjKind::Error(message.to_string()), OType::Error)
    }

    pub fn with_tid(mut self, tid: Furi) -> Self {
        self.tid = tid;
        self
    }

    pub fn with_vid(mut self, vid: Furi) -> Self {
        self.vid = Some(vid);
        self
    }

    pub fn otype(&self) -> OType {
        match &self.kind {
            ObjKind::Noobj => OType::Noobj,
            ObjKind::Bool(_) => OType::Bool,
            ObjKind::Int(_) => OType::Int,
            ObjKind::Real(_) => OType::Real,
            ObjKind::Str(_) => OType::Str,
            ObjKind::Uri(_) => OType::Uri,
            ObjKind::Lst(_) => OType::Lst,
            ObjKind::Rec(_) => OType::Rec,
            ObjKind::Inst(_) => OType::Inst,
            ObjKind::Bcode(_) => OType::Bcode,
            ObjKind::Type(_) => OType::Type,
            ObjKind::Error(_) => OType::Error,
        }
    }

    pub fn is_noobj(&self) -> bool {
        matches!(self.kind, ObjKind::Noobj)
    }

    pub fn is_inst(&self) -> bool {
        matches!(self.kind, ObjKind::Inst(_))
    }

    /// An instruction or bytecode.
    pub fn is_code(&self) -> bool {
        matches!(self.kind, ObjKind::Inst(_) | ObjKind::Bcode(_))
    }

    /// An instruction with a native body, or non-empty bytecode.
    pub fn is_invokable(&self) -> bool {
        match &self.kind {
            ObjKind::Inst(inst) => !inst.is_stub(),
            ObjKind::Bcode(insts) => !insts.is_empty(),
            _ => false,
        }
    }

    pub fn vid_or_tid(&self) -> &Furi {
        self.vid.as_ref().unwrap_or(&self.tid)
    }

    pub fn as_inst(&self) -> Result<&Inst, Error> {
        match &self.kind {
            ObjKind::Inst(inst) => Ok(inst),
            _ => Err(self.wrong_variant("inst")),
        }
    }

    pub fn as_int(&self) -> Result<i64, Error> {
        match self.kind {
            ObjKind::Int(i) => Ok(i),
            _ => Err(self.wrong_variant("int")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self.kind {
            ObjKind::Bool(b) => Ok(b),
            _ => Err(self.wrong_variant("bool")),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match &self.kind {
            ObjKind::Str(s) => Ok(s),
            _ => Err(self.wrong_variant("str")),
        }
    }

    pub fn as_rec(&self) -> Result<&BTreeMap<Furi, Obj>, Error> {
        match &self.kind {
            ObjKind::Rec(fields) => Ok(fields),
            _ => Err(self.wrong_variant("rec")),
        }
    }

    pub fn as_lst(&self) -> Result<&[Obj], Error> {
        match &self.kind {
            ObjKind::Lst(values) => Ok(values),
            _ => Err(self.wrong_variant("lst")),
        }
    }

    fn wrong_variant(&self, expected: &'static str) -> Error {
        Error::WrongVariant {
            expected,
            found: self.to_string(),
        }
    }

    /// The field whose key (ignoring its query) renders as `key`.
    pub fn rec_get(&self, key: &str) -> Option<&Obj> {
        match &self.kind {
            ObjKind::Rec(fields) => fields
                .iter()
                .find(|(k, _)| k.no_query().to_string() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// The domain/range signature recorded in the type id.
    pub fn signature(&self) -> Result<DomainRange, Error> {
        Ok(self.tid.dom_rng()?)
    }

    pub fn domain(&self) -> Result<Furi, Error> {
        Ok(self.signature()?.domain)
    }

    pub fn range(&self) -> Result<Furi, Error> {
        Ok(self.signature()?.range)
    }

    pub fn domain_coefficient(&self) -> Result<Coefficient, Error> {
        Ok(self.signature()?.domain_coefficient)
    }

    pub fn range_coefficient(&self) -> Result<Coefficient, Error> {
        Ok(self.signature()?.range_coefficient)
    }

    /// Apply this object to `lhs`: instructions run, bytecode folds, anything else is a constant.
    pub fn apply(&self, lhs: &Obj) -> Result<Obj, Error> {
        match &self.kind {
            ObjKind::Inst(inst) => inst.apply(lhs),
            ObjKind::Bcode(insts) => insts
                .iter()
                .try_fold(lhs.clone(), |current, inst| inst.apply(&current)),
            _ => Ok(self.clone()),
        }
    }

    /// Structurally match this value against a type definition, collecting failure reasons.
    pub fn matches_def(&self, def: &Obj, reasons: &mut Vec<String>) -> bool {
        let matched = match (&self.kind, &def.kind) {
            (_, ObjKind::Type(OType::Obj)) => true,
            (ObjKind::Type(a), ObjKind::Type(b)) => a == b,
            (_, ObjKind::Type(kind)) => self.otype() == *kind,
            (_, ObjKind::Inst(_) | ObjKind::Bcode(_)) => true,
            (ObjKind::Noobj, ObjKind::Noobj) => true,
            (ObjKind::Uri(value), ObjKind::Uri(pattern)) => value.matches(pattern),
            (ObjKind::Lst(values), ObjKind::Lst(defs)) => {
                values.len() == defs.len()
                    && values
                        .iter()
                        .zip(defs.iter())
                        .all(|(v, d)| v.matches_def(d, reasons))
            }
            (ObjKind::Rec(fields), ObjKind::Rec(defs)) => defs.iter().all(|(key, d)| {
                let key = key.no_query();
                match fields.iter().find(|(k, _)| k.no_query() == key) {
                    Some((_, v)) => v.matches_def(d, reasons),
                    None => {
                        reasons.push(format!("missing key {}", key));
                        false
                    }
                }
            }),
            (a, b) => a == b,
        };
        if !matched {
            reasons.push(format!("{} is not {}", self, def));
        }
        matched
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.kind {
            ObjKind::Noobj => "noobj".to_string(),
            ObjKind::Bool(b) => b.to_string(),
            ObjKind::Int(i) => i.to_string(),
            ObjKind::Real(r) => r.to_string(),
            ObjKind::Str(s) => format!("'{}'", s),
            ObjKind::Uri(u) => format!("<{}>", u),
            ObjKind::Lst(values) => format!(
                "[{}]",
                values
                    .iter()
                    .map(Obj::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            ObjKind::Rec(fields) if fields.is_empty() => "[=>]".to_string(),
            ObjKind::Rec(fields) => format!(
                "[{}]",
                fields
                    .iter()
                    .map(|(k, v)| format!("{}=>{}", k, v))
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            ObjKind::Inst(inst) => return write!(f, "{}{}", inst.op, inst.args),
            ObjKind::Bcode(insts) => insts
                .iter()
                .map(|i| format!("{}{}", i.op, i.args))
                .collect::<Vec<_>>()
                .join("."),
            ObjKind::Type(kind) => return write!(f, "{}", kind.name()),
            ObjKind::Error(message) => format!("error('{}')", message),
        };
        if self.tid.no_query() == *self.otype().base_id() {
            f.write_str(&body)
        } else {
            write!(f, "{}[{}]", self.tid.no_query().name(), body)
        }
    }
}
