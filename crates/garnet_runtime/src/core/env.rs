//! Lexical environment chain.
//!
//! Every frame owns its local bindings and links to two other frames:
//! - `outer`: the lexically enclosing frame, searched by `lookup`/`assign`. Blocks keep
//!   their creation frame alive through this link.
//! - `caller`: the frame that invoked this one. It is only used for backtraces and
//!   introspection, so it is held weakly.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::block::BlockRef;
use super::value::{FastHashMap, Value, fast_map_new};

pub type EnvRef = Rc<Env>;

#[derive(Clone, Debug)]
pub struct Scope {
    pub vars: FastHashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self { vars: fast_map_new() }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvFlags {
    /// Set while a rescue clause of this frame is running.
    pub rescuing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameLabel {
    Main,
    Method(String),
    /// Block frame; carries the label of the frame the block was created in.
    Block(Box<FrameLabel>),
}

impl FrameLabel {
    pub fn method_name(&self) -> Option<&str> {
        match self {
            FrameLabel::Main => None,
            FrameLabel::Method(name) => Some(name),
            FrameLabel::Block(owner) => owner.method_name(),
        }
    }
}

impl fmt::Display for FrameLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameLabel::Main => f.write_str("<main>"),
            FrameLabel::Method(name) => write!(f, "in '{}'", name),
            FrameLabel::Block(owner) => match owner.method_name() {
                Some(name) => write!(f, "block in '{}'", name),
                None => f.write_str("block in <main>"),
            },
        }
    }
}

pub struct Env {
    scope: RefCell<Scope>,
    outer: Option<EnvRef>,
    caller: Option<Weak<Env>>,
    label: FrameLabel,
    block: Option<BlockRef>,
    flags: Cell<EnvFlags>,
}

impl Env {
    fn build(
        outer: Option<&EnvRef>,
        caller: Option<&EnvRef>,
        label: FrameLabel,
        block: Option<BlockRef>,
    ) -> EnvRef {
        Rc::new(Self {
            scope: RefCell::new(Scope::new()),
            outer: outer.cloned(),
            caller: caller.map(Rc::downgrade),
            label,
            block,
            flags: Cell::new(EnvFlags::default()),
        })
    }

    /// Top-level frame: no outer, no caller.
    pub fn root() -> EnvRef {
        Self::build(None, None, FrameLabel::Main, None)
    }

    /// Fresh frame linked as given. It reports the same label as its outer frame.
    pub fn new_child(outer: Option<&EnvRef>, caller: Option<&EnvRef>) -> EnvRef {
        let label = outer.map_or(FrameLabel::Main, |o| o.label.clone());
        Self::build(outer, caller, label, None)
    }

    /// Frame for a compiled method body. Methods do not close over their caller.
    pub fn new_method_frame(caller: &EnvRef, method_name: &str, block: Option<BlockRef>) -> EnvRef {
        Self::build(
            None,
            Some(caller),
            FrameLabel::Method(method_name.to_string()),
            block,
        )
    }

    /// Frame for running a block: closes over the block's captured frame.
    pub fn new_block_frame(captured: &EnvRef, caller: &EnvRef) -> EnvRef {
        let owner = match &captured.label {
            FrameLabel::Block(owner) => owner.as_ref().clone(),
            other => other.clone(),
        };
        Self::build(
            Some(captured),
            Some(caller),
            FrameLabel::Block(Box::new(owner)),
            None,
        )
    }

    pub fn outer(&self) -> Option<&EnvRef> {
        self.outer.as_ref()
    }

    pub fn caller(&self) -> Option<EnvRef> {
        self.caller.as_ref().and_then(Weak::upgrade)
    }

    pub fn label(&self) -> &FrameLabel {
        &self.label
    }

    /// Search this frame, then each outer frame.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.scope.borrow().vars.get(name) {
            return Some(*v);
        }
        let mut frame = self.outer.as_ref();
        while let Some(env) = frame {
            if let Some(v) = env.scope.borrow().vars.get(name) {
                return Some(*v);
            }
            frame = env.outer.as_ref();
        }
        None
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Update the nearest existing binding, or create one in this frame.
    pub fn assign(&self, name: &str, value: Value) {
        if let Some(slot) = self.scope.borrow_mut().vars.get_mut(name) {
            *slot = value;
            return;
        }
        let mut frame = self.outer.as_ref();
        while let Some(env) = frame {
            if let Some(slot) = env.scope.borrow_mut().vars.get_mut(name) {
                *slot = value;
                return;
            }
            frame = env.outer.as_ref();
        }
        self.define(name, value);
    }

    /// Bind in this frame only, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.scope.borrow_mut().vars.insert(name.to_string(), value);
    }

    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scope.borrow().vars.keys().cloned().collect();
        names.sort();
        names
    }

    /// Block passed to the nearest enclosing method frame.
    pub fn block(&self) -> Option<BlockRef> {
        if let Some(b) = &self.block {
            return Some(b.clone());
        }
        let mut frame = self.outer.as_ref();
        while let Some(env) = frame {
            if let Some(b) = &env.block {
                return Some(b.clone());
            }
            frame = env.outer.as_ref();
        }
        None
    }

    pub fn flags(&self) -> EnvFlags {
        self.flags.get()
    }

    pub fn is_rescuing(&self) -> bool {
        self.flags.get().rescuing
    }

    pub fn set_rescuing(&self, rescuing: bool) {
        let mut flags = self.flags.get();
        flags.rescuing = rescuing;
        self.flags.set(flags);
    }

    /// Frame labels from this frame out through the caller chain, innermost first.
    pub fn backtrace(&self) -> Vec<String> {
        let mut out = vec![self.label.to_string()];
        let mut frame = self.caller();
        while let Some(env) = frame {
            out.push(env.label.to_string());
            frame = env.caller();
        }
        out
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("label", &self.label)
            .field("locals", &self.local_names())
            .field("has_outer", &self.outer.is_some())
            .field("flags", &self.flags.get())
            .finish()
    }
}
