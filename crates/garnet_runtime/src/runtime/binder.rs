//! Parameter binding: maps call-site arguments onto declared parameter shapes.
//!
//! Generated code binds one parameter at a time. A parameter is addressed by a path of
//! indices into the incoming argument array; paths longer than one step destructure
//! nested arrays, as in `|a, (b, c)|`.

use garnet_core::DiagnosticKind;
use smallvec::SmallVec;

use crate::core::{EnvRef, Value};
use crate::errors::{EvalResult, RuntimeError};

use super::core::Runtime;

/// Shape of one declared positional parameter and of the list it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalParam {
    /// Default expression value, when the parameter is optional.
    pub default: Option<Value>,
    /// Collects the remaining arguments into an array.
    pub splat: bool,
    /// Number of positional parameters declared in the list.
    pub total: usize,
    /// Number of optional parameters in the list.
    pub default_count: usize,
    /// Optional parameters sit after the required ones.
    pub defaults_on_right: bool,
    /// Parameters declared after the splat.
    pub offset_from_end: usize,
}

impl PositionalParam {
    pub fn required(total: usize) -> Self {
        Self {
            default: None,
            splat: false,
            total,
            default_count: 0,
            defaults_on_right: false,
            offset_from_end: 0,
        }
    }

    pub fn optional(total: usize, default: Value, default_count: usize, defaults_on_right: bool) -> Self {
        Self {
            default: Some(default),
            default_count,
            defaults_on_right,
            ..Self::required(total)
        }
    }

    pub fn rest(total: usize, offset_from_end: usize) -> Self {
        Self {
            splat: true,
            offset_from_end,
            ..Self::required(total)
        }
    }

    /// Same list shape, for another parameter of it.
    pub fn with_default(self, default: Option<Value>) -> Self {
        Self { default, ..self }
    }
}

/// One slot filled by `spread_native_args`.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeArg {
    Object(Value),
    Int(i64),
    /// `None` when the argument was nil.
    Str(Option<String>),
    Bool(bool),
    Ptr(usize),
}

impl NativeArg {
    pub fn as_object(&self) -> Option<Value> {
        match self {
            NativeArg::Object(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            NativeArg::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl Runtime {
    /// Resolve one positional parameter from `value` following `path`.
    ///
    /// With fewer values than declared slots, optional parameters on the left give up their
    /// values first: an index inside the default window answers the default, and the
    /// indices of the required parameters after it shift left by the missing count.
    /// Negative indices count from the end; when the list is short they count from
    /// `total`, assuming a splat absorbed the middle.
    pub fn bind_positional(&mut self, value: Value, param: &PositionalParam, path: &[isize]) -> Value {
        let default = param.default.unwrap_or(self.nil());
        let has_default = param.default.is_some();
        let defaults_on_left = !param.defaults_on_right;
        let total = param.total as isize;
        let default_count = param.default_count as isize;
        let required = total - default_count;

        let mut current = value;
        for (step, &path_index) in path.iter().enumerate() {
            if param.splat && step == path.len() - 1 {
                return self.splat_range(current, path_index, param.offset_from_end);
            }
            let Some(len) = self.array_len(current) else {
                // A scalar stands for itself at index 0.
                if path_index != 0 {
                    current = default;
                }
                continue;
            };
            let len = len as isize;
            let mut index = path_index;

            let remain = len - required;
            if has_default && defaults_on_left && index >= remain && index < default_count {
                return default;
            }

            if step == 0 && path.len() == 1 && defaults_on_left {
                let extra = len - required;
                if extra > 0 && default_count >= extra && index >= extra {
                    index -= default_count - extra;
                } else if len <= required {
                    index -= default_count;
                }
            }

            if index < 0 {
                index = if len >= total { len + index } else { total - 1 + index };
            }

            current = if (0..len).contains(&index) {
                self.array_get(current, index as usize).unwrap_or(default)
            } else {
                default
            };
        }
        current
    }

    /// Plain multiple-assignment destructuring: no default windowing.
    pub fn array_value_by_path(
        &mut self,
        value: Value,
        default: Option<Value>,
        splat: bool,
        offset_from_end: usize,
        path: &[isize],
    ) -> Value {
        let default = default.unwrap_or(self.nil());
        let mut current = value;
        for (step, &path_index) in path.iter().enumerate() {
            if splat && step == path.len() - 1 {
                return self.splat_range(current, path_index, offset_from_end);
            }
            current = match self.array_len(current) {
                Some(len) => {
                    let len = len as isize;
                    let index = if path_index < 0 { len + path_index } else { path_index };
                    if (0..len).contains(&index) {
                        self.array_get(current, index as usize).unwrap_or(default)
                    } else {
                        default
                    }
                }
                None if path_index == 0 => current,
                None => default,
            };
        }
        current
    }

    /// Elements `[start, len - offset_from_end)` as a new array.
    fn splat_range(&mut self, value: Value, start: isize, offset_from_end: usize) -> Value {
        let items = match self.array(value) {
            Some(items) => {
                let end = items.len().saturating_sub(offset_from_end);
                let start = start.max(0) as usize;
                if start < end {
                    items[start..end].to_vec()
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };
        self.make_array(items)
    }

    /// Keyword parameter `name`, read from the trailing Hash argument if there is one.
    pub fn bind_keyword(
        &mut self,
        env: &EnvRef,
        args: &[Value],
        name: &str,
        default: Option<Value>,
    ) -> EvalResult {
        let carrier = args.last().copied().filter(|v| self.is_hash(*v));
        let found = match carrier {
            Some(hash) => {
                let key = self.intern(name);
                self.hash_get(env, hash, key)?
            }
            None => None,
        };
        match found.or(default) {
            Some(value) => Ok(value),
            None => Err(self.error(env, DiagnosticKind::MissingKeyword(name.to_string()))),
        }
    }

    /// Bind `args` into typed slots, one per format code:
    /// `o` any object, `i` Integer, `s` String or nil, `b` truthiness,
    /// `v` the pointer held by the argument's `@_ptr` (a VoidP).
    pub fn spread_native_args(
        &mut self,
        env: &EnvRef,
        args: &[Value],
        format: &str,
    ) -> EvalResult<SmallVec<[NativeArg; 4]>> {
        let mut out = SmallVec::new();
        for (i, code) in format.chars().enumerate() {
            if !matches!(code, 'o' | 'i' | 's' | 'b' | 'v') {
                return Err(self.error(env, DiagnosticKind::UnknownSpreadCode(code)));
            }
            let Some(&arg) = args.get(i) else {
                return Err(self.error(
                    env,
                    DiagnosticKind::ArgumentCountMismatch {
                        given: args.len(),
                        expected_min: i + 1,
                        expected_max: Some(i + 1),
                    },
                ));
            };
            let slot = match code {
                'o' => NativeArg::Object(arg),
                'i' => match self.as_integer(arg) {
                    Some(n) => NativeArg::Int(n),
                    None => return Err(self.no_implicit_conversion(env, arg, "Integer")),
                },
                's' if self.is_nil(arg) => NativeArg::Str(None),
                's' => match self.as_str(arg) {
                    Some(s) => NativeArg::Str(Some(s.to_string())),
                    None => return Err(self.no_implicit_conversion(env, arg, "String")),
                },
                'b' => NativeArg::Bool(self.truthy(arg)),
                _ => {
                    let holder = self.ivar_get(arg, "@_ptr");
                    match self.void_ptr(holder) {
                        Some(ptr) => NativeArg::Ptr(ptr),
                        None => {
                            let class_name = self.class_name_of(holder).to_string();
                            return Err(self.error(env, DiagnosticKind::NotAPointer(class_name)));
                        }
                    }
                }
            };
            out.push(slot);
        }
        Ok(out)
    }

    fn no_implicit_conversion(&self, env: &EnvRef, value: Value, into: &str) -> RuntimeError {
        self.error(
            env,
            DiagnosticKind::NoImplicitConversion {
                from: self.class_name_of(value).to_string(),
                into: into.to_string(),
            },
        )
    }

    /// Implicit Array conversion.
    ///
    /// Arrays pass through. An object answering `to_ary` is converted; a nil answer, or any
    /// non-Array answer when `raise_for_non_array` is off, wraps the object in a one-element
    /// array instead. Everything else is wrapped.
    pub fn to_ary(&mut self, env: &EnvRef, value: Value, raise_for_non_array: bool) -> EvalResult {
        if self.is_array(value) {
            return Ok(value);
        }
        if self.respond_to(value, "to_ary") {
            let converted = self.send(env, value, "to_ary", &[], None)?;
            if self.is_array(converted) {
                return Ok(converted);
            }
            if raise_for_non_array && !self.is_nil(converted) {
                return Err(self.error(
                    env,
                    DiagnosticKind::ToAryConversion {
                        class_name: self.class_name_of(value).to_string(),
                        result_class: self.class_name_of(converted).to_string(),
                    },
                ));
            }
        }
        Ok(self.make_array(vec![value]))
    }

    /// `*value` at a call site: a copy of an Array, else a lenient `to_ary`.
    pub fn splat(&mut self, env: &EnvRef, value: Value) -> EvalResult {
        if let Some(items) = self.array(value).map(<[Value]>::to_vec) {
            return Ok(self.make_array(items));
        }
        self.to_ary(env, value, false)
    }

    pub fn args_to_array(&mut self, args: &[Value]) -> Value {
        self.make_array(args.to_vec())
    }

    /// Block arguments as an array. A single argument given to a block that declares
    /// more than one parameter is spread through `to_ary`.
    pub fn block_args_to_array(
        &mut self,
        env: &EnvRef,
        signature_size: usize,
        args: &[Value],
    ) -> EvalResult {
        if let [single] = args {
            if signature_size > 1 {
                return self.to_ary(env, *single, true);
            }
        }
        Ok(self.args_to_array(args))
    }

    /// Raise ArgumentError unless `min <= given <= max` (`max = None` is unbounded).
    pub fn check_arity(
        &self,
        env: &EnvRef,
        given: usize,
        min: usize,
        max: Option<usize>,
    ) -> EvalResult<()> {
        if given < min || max.is_some_and(|max| given > max) {
            return Err(self.error(
                env,
                DiagnosticKind::ArgumentCountMismatch {
                    given,
                    expected_min: min,
                    expected_max: max,
                },
            ));
        }
        Ok(())
    }
}
