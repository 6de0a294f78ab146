//! The oracle the resolver and compiler consult.

use std::sync::Arc;

use fhatos_furi::Furi;

use crate::Obj;

/// Read access to the object graph plus namespace expansion.
///
/// Both operations are total. A missing object is reported as [`Obj::noobj`], an unknown
/// namespace by returning the input unchanged. Neither call may block indefinitely, which is
/// what bounds instruction resolution.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Oracle>`.
pub trait Oracle {
    /// The object stored at `id`, or noobj.
    fn read(&self, id: &Furi) -> Obj;

    /// Expand namespace aliases and auto-prefixes.
    fn resolve_namespace(&self, furi: &Furi) -> Furi;
}

// Blanket implementations for references and smart pointers

impl<T: Oracle + ?Sized> Oracle for &T {
    fn read(&self, id: &Furi) -> Obj {
        (**self).read(id)
    }

    fn resolve_namespace(&self, furi: &Furi) -> Furi {
        (**self).resolve_namespace(furi)
    }
}

impl<T: Oracle + ?Sized> Oracle for &mut T {
    fn read(&self, id: &Furi) -> Obj {
        (**self).read(id)
    }

    fn resolve_namespace(&self, furi: &Furi) -> Furi {
        (**self).resolve_namespace(furi)
    }
}

impl<T: Oracle + ?Sized> Oracle for Box<T> {
    fn read(&self, id: &Furi) -> Obj {
        (**self).read(id)
    }

    fn resolve_namespace(&self, furi: &Furi) -> Furi {
        (**self).resolve_namespace(furi)
    }
}

impl<T: Oracle + ?Sized> Oracle for Arc<T> {
    fn read(&self, id: &Furi) -> Obj {
        (**self).read(id)
    }

    fn resolve_namespace(&self, furi: &Furi) -> Furi {
        (**self).resolve_namespace(furi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhatos_furi::furi;

    struct Constant;

    impl Oracle for Constant {
        fn read(&self, _id: &Furi) -> Obj {
            Obj::int(1)
        }

        fn resolve_namespace(&self, furi: &Furi) -> Furi {
            furi.clone()
        }
    }

    fn read_through<O: Oracle>(oracle: O) -> Obj {
        oracle.read(&furi!("/a"))
    }

    #[test]
    fn blanket_impls_delegate() {
        let oracle = Constant;
        assert_eq!(read_through(&oracle), Obj::int(1));
        assert_eq!(read_through(Box::new(Constant)), Obj::int(1));
        assert_eq!(read_through(Arc::new(Constant)), Obj::int(1));
        let boxed: Box<dyn Oracle> = Box::new(Constant);
        assert_eq!(boxed.resolve_namespace(&furi!("x")), furi!("x"));
    }
}
