use std::fmt;

type Unregister = Box<dyn FnOnce() + Send>;

/// A registered host callback. Its unregister action runs exactly once,
/// either through [`Hook::unregister`] or when the hook is dropped.
pub struct Hook {
    name: &'static str,
    unregister: Option<Unregister>,
}

impl Hook {
    pub fn new(name: &'static str, unregister: impl FnOnce() + Send + 'static) -> Self {
        Self {
            name,
            unregister: Some(Box::new(unregister)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn unregister(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            tracing::debug!(hook = self.name, "unregistering hook");
            unregister();
        }
    }
}

impl Drop for Hook {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("active", &self.unregister.is_some())
            .finish()
    }
}

/// Hooks owned by one mounted integration, released newest first
#[derive(Debug, Default)]
pub struct Hooks {
    active: Vec<Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hook: Hook) {
        self.active.push(hook);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Unregister everything now; the set can be reused afterwards
    pub fn clear(&mut self) {
        while let Some(hook) = self.active.pop() {
            hook.unregister();
        }
    }
}

impl Drop for Hooks {
    fn drop(&mut self) {
        self.clear();
    }
}
