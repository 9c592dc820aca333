//! Opaque host-provided payloads.
//!
//! `userdata` values are never produced by the parser itself — only host
//! bindings construct them, typically to stash a native object inside the
//! tree. The destructor runs exactly once, when the last reference to the
//! payload is dropped.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

struct Inner {
    data: Box<dyn Any>,
    destructor: Option<Box<dyn FnMut(&mut dyn Any)>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(mut destructor) = self.destructor.take() {
            destructor(&mut *self.data);
        }
    }
}

/// A reference-counted, opaque payload with an optional destructor.
#[derive(Clone)]
pub struct UserData(Rc<Inner>);

impl UserData {
    pub fn new(data: impl Any) -> Self {
        Self(Rc::new(Inner {
            data: Box::new(data),
            destructor: None,
        }))
    }

    pub fn with_destructor(
        data: impl Any,
        destructor: impl FnMut(&mut dyn Any) + 'static,
    ) -> Self {
        Self(Rc::new(Inner {
            data: Box::new(data),
            destructor: Some(Box::new(destructor)),
        }))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.data.downcast_ref()
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserData(..)")
    }
}

impl PartialEq for UserData {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
