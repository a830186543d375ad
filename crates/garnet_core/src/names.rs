//! Identifier classification.
//!
//! Names that start with an uppercase ASCII letter are constants, names that start
//! with `$` are globals and names that start with `@` are instance variables.
//! Everything else is a local variable (or a method call).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Constant,
    Global,
    InstanceVariable,
    Local,
}

pub fn is_constant_name(name: &str) -> bool {
    name.as_bytes().first().is_some_and(|b| b.is_ascii_uppercase())
}

pub fn is_global_name(name: &str) -> bool {
    name.starts_with('$')
}

pub fn is_ivar_name(name: &str) -> bool {
    name.starts_with('@')
}

pub fn classify_name(name: &str) -> NameKind {
    if is_constant_name(name) {
        NameKind::Constant
    } else if is_global_name(name) {
        NameKind::Global
    } else if is_ivar_name(name) {
        NameKind::InstanceVariable
    } else {
        NameKind::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_first_character() {
        assert_eq!(classify_name("Object"), NameKind::Constant);
        assert_eq!(classify_name("$stderr"), NameKind::Global);
        assert_eq!(classify_name("@_ptr"), NameKind::InstanceVariable);
        assert_eq!(classify_name("foo"), NameKind::Local);
        assert_eq!(classify_name("_Foo"), NameKind::Local);
        assert_eq!(classify_name(""), NameKind::Local);
    }
}
