//! Error taxonomy shared by every runtime component.
//!
//! A `DiagnosticKind` describes *what* went wrong; `DiagnosticsFormatter` turns it into the
//! message text user code sees, and `DiagnosticKind::error_class` names the exception class
//! the condition is raised as.

use std::fmt;

/// Exception classes the core can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    StandardError,
    ArgumentError,
    NameError,
    NoMethodError,
    TypeError,
    LocalJumpError,
    RuntimeError,
    FrozenError,
    SystemStackError,
}

impl ErrorClass {
    pub const ALL: [ErrorClass; 9] = [
        ErrorClass::StandardError,
        ErrorClass::ArgumentError,
        ErrorClass::NameError,
        ErrorClass::NoMethodError,
        ErrorClass::TypeError,
        ErrorClass::LocalJumpError,
        ErrorClass::RuntimeError,
        ErrorClass::FrozenError,
        ErrorClass::SystemStackError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorClass::StandardError => "StandardError",
            ErrorClass::ArgumentError => "ArgumentError",
            ErrorClass::NameError => "NameError",
            ErrorClass::NoMethodError => "NoMethodError",
            ErrorClass::TypeError => "TypeError",
            ErrorClass::LocalJumpError => "LocalJumpError",
            ErrorClass::RuntimeError => "RuntimeError",
            ErrorClass::FrozenError => "FrozenError",
            ErrorClass::SystemStackError => "SystemStackError",
        }
    }

    /// Name of the superclass this exception class is created under at bootstrap.
    pub fn superclass_name(self) -> &'static str {
        match self {
            ErrorClass::StandardError | ErrorClass::SystemStackError => "Exception",
            ErrorClass::NoMethodError => "NameError",
            ErrorClass::FrozenError => "RuntimeError",
            _ => "StandardError",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    // Dispatch
    NoMethod {
        selector: String,
        class_name: String,
    },
    NoBlockGiven,
    BreakFromProcClosure,
    StackTooDeep,

    // Arity and arguments
    ArgumentCountMismatch {
        given: usize,
        expected_min: usize,
        expected_max: Option<usize>,
    },
    MissingKeyword(String),
    UnknownSpreadCode(char),

    // Hash
    OddHashArguments,
    WrongHashElement,
    InvalidHashPairSize(usize),
    HashInsertDuringIteration,
    Frozen(String),

    // Types
    NoImplicitConversion {
        from: String,
        into: String,
    },
    WrongArgumentType {
        actual: String,
        expected: String,
    },
    ToAryConversion {
        class_name: String,
        result_class: String,
    },
    NotAPointer(String),

    // Names
    UndefinedLocal(String),
    UninitializedConstant(String),

    // Custom
    Raw(ErrorClass, String),
}

impl DiagnosticKind {
    pub fn error_class(&self) -> ErrorClass {
        match self {
            DiagnosticKind::NoMethod { .. } => ErrorClass::NoMethodError,
            DiagnosticKind::NoBlockGiven | DiagnosticKind::BreakFromProcClosure => {
                ErrorClass::LocalJumpError
            }
            DiagnosticKind::StackTooDeep => ErrorClass::SystemStackError,
            DiagnosticKind::ArgumentCountMismatch { .. }
            | DiagnosticKind::MissingKeyword(_)
            | DiagnosticKind::UnknownSpreadCode(_)
            | DiagnosticKind::OddHashArguments
            | DiagnosticKind::WrongHashElement
            | DiagnosticKind::InvalidHashPairSize(_)
            | DiagnosticKind::HashInsertDuringIteration => ErrorClass::ArgumentError,
            DiagnosticKind::Frozen(_) => ErrorClass::FrozenError,
            DiagnosticKind::NoImplicitConversion { .. }
            | DiagnosticKind::WrongArgumentType { .. }
            | DiagnosticKind::ToAryConversion { .. }
            | DiagnosticKind::NotAPointer(_) => ErrorClass::TypeError,
            DiagnosticKind::UndefinedLocal(_) | DiagnosticKind::UninitializedConstant(_) => {
                ErrorClass::NameError
            }
            DiagnosticKind::Raw(class, _) => *class,
        }
    }
}

pub struct DiagnosticsFormatter;

impl DiagnosticsFormatter {
    pub fn format(kind: &DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::NoMethod {
                selector,
                class_name,
            } => format!(
                "undefined method '{}' for an instance of {}",
                selector, class_name
            ),
            DiagnosticKind::NoBlockGiven => "no block given".into(),
            DiagnosticKind::BreakFromProcClosure => "break from proc-closure".into(),
            DiagnosticKind::StackTooDeep => "stack level too deep".into(),

            DiagnosticKind::ArgumentCountMismatch {
                given,
                expected_min,
                expected_max,
            } => match expected_max {
                Some(max) if max == expected_min => format!(
                    "wrong number of arguments (given {}, expected {})",
                    given, expected_min
                ),
                Some(max) => format!(
                    "wrong number of arguments (given {}, expected {}..{})",
                    given, expected_min, max
                ),
                None => format!(
                    "wrong number of arguments (given {}, expected {}+)",
                    given, expected_min
                ),
            },
            DiagnosticKind::MissingKeyword(name) => format!("missing keyword: :{}", name),
            DiagnosticKind::UnknownSpreadCode(c) => {
                format!("unknown argument spread specifier: {}", c)
            }

            DiagnosticKind::OddHashArguments => "odd number of arguments for Hash".into(),
            DiagnosticKind::WrongHashElement => "wrong element in array to Hash[]".into(),
            DiagnosticKind::InvalidHashPairSize(size) => {
                format!("invalid number of elements ({} for 1..2)", size)
            }
            DiagnosticKind::HashInsertDuringIteration => {
                "can't add a new key into hash during iteration".into()
            }
            DiagnosticKind::Frozen(class_name) => format!("can't modify frozen {}", class_name),

            DiagnosticKind::NoImplicitConversion { from, into } => {
                format!("no implicit conversion of {} into {}", from, into)
            }
            DiagnosticKind::WrongArgumentType { actual, expected } => {
                format!("wrong argument type {} (expected {})", actual, expected)
            }
            DiagnosticKind::ToAryConversion {
                class_name,
                result_class,
            } => format!(
                "can't convert {} to Array ({}#to_ary gives {})",
                class_name, class_name, result_class
            ),
            DiagnosticKind::NotAPointer(class_name) => {
                format!("expected VoidP in @_ptr but got {}", class_name)
            }

            DiagnosticKind::UndefinedLocal(name) => {
                format!("undefined local variable or method '{}' for main", name)
            }
            DiagnosticKind::UninitializedConstant(name) => {
                format!("uninitialized constant {}", name)
            }

            DiagnosticKind::Raw(_, msg) => msg.clone(),
        }
    }
}
