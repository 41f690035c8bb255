//! Input scope stack
//!
//! Toggling only ever touches the top: a scope that is currently active is
//! popped, anything else is pushed. Two toggles of the same scope therefore
//! leave the stack as it was. The active scope is the top of the stack.

use crate::types::Scope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new(initial: Scope) -> Self {
        Self {
            scopes: vec![initial],
        }
    }

    /// Scope currently receiving input
    pub fn active(&self) -> Option<Scope> {
        self.scopes.last().copied()
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    pub fn as_slice(&self) -> &[Scope] {
        &self.scopes
    }

    /// Pop `scope` if it is active, push it otherwise; returns the new active scope
    pub fn toggle(&mut self, scope: Scope) -> Option<Scope> {
        if self.scopes.last() == Some(&scope) {
            self.scopes.pop();
        } else {
            self.scopes.push(scope);
        }
        self.active()
    }

    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_scope() -> impl Strategy<Value = Scope> {
        prop::sample::select(Scope::ALL.to_vec())
    }

    #[test]
    fn test_toggle_pushes_then_removes() {
        let mut stack = ScopeStack::new(Scope::Trace);
        assert_eq!(stack.toggle(Scope::Braille), Some(Scope::Braille));
        assert_eq!(stack.as_slice(), &[Scope::Trace, Scope::Braille]);
        assert_eq!(stack.toggle(Scope::Braille), Some(Scope::Trace));
        assert_eq!(stack.as_slice(), &[Scope::Trace]);
    }

    #[test]
    fn test_buried_scope_is_pushed_again() {
        let mut stack = ScopeStack::new(Scope::Trace);
        stack.toggle(Scope::Braille);
        stack.toggle(Scope::Review);
        assert_eq!(stack.toggle(Scope::Braille), Some(Scope::Braille));
        assert_eq!(
            stack.as_slice(),
            &[Scope::Trace, Scope::Braille, Scope::Review, Scope::Braille]
        );

        assert_eq!(stack.toggle(Scope::Braille), Some(Scope::Review));
        assert_eq!(
            stack.as_slice(),
            &[Scope::Trace, Scope::Braille, Scope::Review]
        );
    }

    #[test]
    fn test_toggling_root_scope_empties_stack() {
        let mut stack = ScopeStack::new(Scope::Subplot);
        assert_eq!(stack.toggle(Scope::Subplot), None);
        assert!(stack.as_slice().is_empty());
        assert_eq!(stack.toggle(Scope::Subplot), Some(Scope::Subplot));
        assert_eq!(stack, ScopeStack::new(Scope::Subplot));
    }

    proptest! {
        #[test]
        fn prop_double_toggle_restores_stack(
            setup in prop::collection::vec(any_scope(), 0..6),
            scope in any_scope(),
        ) {
            let mut stack = ScopeStack::new(Scope::Subplot);
            for s in setup {
                stack.toggle(s);
            }
            let before = stack.clone();
            let active = stack.active();

            stack.toggle(scope);
            stack.toggle(scope);

            prop_assert_eq!(stack.active(), active);
            prop_assert_eq!(stack, before);
        }
    }
}
