//! The fhatos object model and instruction resolution.
//!
//! Objects live in a [`Router`] keyed by fURI. Each object carries a type id (`tid`) naming its
//! type, and types are themselves objects whose `tid` names their super type. The [`Resolver`]
//! walks that chain to find the definition an instruction reference stands for, and the
//! [`Compiler`] merges arguments and type checks values against definitions.
//!
//! ```rust
//! use fhatos_core::{Compiler, Inst, InstF, Args, Obj, Router};
//! use fhatos_furi::furi;
//!
//! let mut router = Router::default();
//! router.write_base_types();
//! let double = Inst::new("double", Args::new())
//!     .with_f(InstF::new(|lhs, _| Ok(Obj::int(lhs.as_int()? * 2))));
//! router.write(&furi!("/mmadt/int::double"), Obj::inst(furi!("/mmadt/int::double"), double));
//!
//! let mut compiler = Compiler::new(router, true);
//! let reference = Obj::inst(furi!("double"), Inst::new("double", Args::new()));
//! assert_eq!(compiler.apply_inst(&Obj::int(21), &reference), Ok(Obj::int(42)));
//! ```

pub mod compiler;
pub mod config;
pub mod derivation;
mod error;
pub mod furi_trie;
pub mod obj;
pub mod resolver;
pub mod router;
pub mod traits;

pub use compiler::{merge_args, Compiler};
pub use config::Config;
pub use derivation::Derivation;
pub use error::Error;
pub use furi_trie::FuriTrie;
pub use obj::{Args, Inst, InstF, OType, Obj, ObjKind};
pub use resolver::{Resolution, Resolver};
pub use router::Router;
pub use traits::Oracle;
