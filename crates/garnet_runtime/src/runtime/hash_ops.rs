//! Hash operations that need dispatch: key hashing, default procs, traversal, equality.

use garnet_core::DiagnosticKind;

use crate::core::{BlockRef, EnvRef, Value};
use crate::errors::EvalResult;

use super::config::Flow;
use super::core::Runtime;

impl Runtime {
    /// `key.hash`, which must answer an Integer.
    pub fn hash_code(&mut self, env: &EnvRef, key: Value) -> EvalResult<i64> {
        let code = self.send(env, key, "hash", &[], None)?;
        self.as_integer(code).ok_or_else(|| {
            self.error(
                env,
                DiagnosticKind::NoImplicitConversion {
                    from: self.class_name_of(code).to_string(),
                    into: "Integer".into(),
                },
            )
        })
    }

    fn expect_hash(&self, env: &EnvRef, hash: Value) -> EvalResult<()> {
        if self.is_hash(hash) {
            Ok(())
        } else {
            Err(self.wrong_type(env, hash, "Hash"))
        }
    }

    /// `Hash.new`: a default value and a default block are mutually exclusive.
    pub fn hash_new(
        &mut self,
        env: &EnvRef,
        default: Option<Value>,
        block: Option<&BlockRef>,
    ) -> EvalResult {
        if block.is_some() && default.is_some() {
            return Err(self.error(
                env,
                DiagnosticKind::ArgumentCountMismatch {
                    given: 1,
                    expected_min: 0,
                    expected_max: Some(0),
                },
            ));
        }
        let hash = self.make_hash();
        if let Some(table) = self.hash_table_mut(hash) {
            table.default_value = default;
            table.default_block = block.cloned();
        }
        Ok(hash)
    }

    pub fn hash_get(&mut self, env: &EnvRef, hash: Value, key: Value) -> EvalResult<Option<Value>> {
        self.expect_hash(env, hash)?;
        let code = self.hash_code(env, key)?;
        Ok(self.hash_table(hash).and_then(|t| t.get(code)))
    }

    /// `hash[key]`: the stored value, else the default block's answer, else the default value.
    pub fn hash_get_or_default(&mut self, env: &EnvRef, hash: Value, key: Value) -> EvalResult {
        if let Some(value) = self.hash_get(env, hash, key)? {
            return Ok(value);
        }
        self.hash_default(env, hash, key)
    }

    fn hash_default(&mut self, env: &EnvRef, hash: Value, key: Value) -> EvalResult {
        let (block, value) = match self.hash_table(hash) {
            Some(t) => (t.default_block.clone(), t.default_value),
            None => (None, None),
        };
        match block {
            Some(block) => self.run_block_without_break(env, Some(&block), &[hash, key]),
            None => Ok(value.unwrap_or(self.nil())),
        }
    }

    /// Store `value` under `key`. Fails without touching the table when the hash is frozen
    /// or when `key` is new and a traversal is running.
    pub fn hash_put(&mut self, env: &EnvRef, hash: Value, key: Value, value: Value) -> EvalResult<()> {
        self.expect_hash(env, hash)?;
        self.check_frozen(env, hash)?;
        let code = self.hash_code(env, key)?;
        let inserted = match self.hash_table_mut(hash) {
            Some(table) => table.insert(code, key, value),
            None => Ok(()),
        };
        inserted.map_err(|kind| self.error(env, kind))
    }

    pub fn hash_remove(&mut self, env: &EnvRef, hash: Value, key: Value) -> EvalResult<Option<Value>> {
        self.expect_hash(env, hash)?;
        self.check_frozen(env, hash)?;
        let code = self.hash_code(env, key)?;
        Ok(self.hash_table_mut(hash).and_then(|t| t.remove(code)))
    }

    pub fn hash_len(&self, hash: Value) -> usize {
        self.hash_table(hash).map_or(0, |t| t.len())
    }

    /// Live `(key, value)` pairs in insertion order.
    pub fn hash_pairs(&self, hash: Value) -> Vec<(Value, Value)> {
        self.hash_table(hash).map(|t| t.pairs()).unwrap_or_default()
    }

    /// `hash.each { |key, value| ... }`. The hash owns the block: a break ends the
    /// traversal and becomes the result; otherwise the hash itself is returned.
    pub fn hash_each(&mut self, env: &EnvRef, hash: Value, block: Option<&BlockRef>) -> EvalResult {
        self.expect_hash(env, hash)?;
        let Some(block) = block else {
            return Err(self.error(env, DiagnosticKind::NoBlockGiven));
        };
        if let Some(table) = self.hash_table_mut(hash) {
            table.begin_iteration();
        }
        let result = self.hash_traverse(env, hash, block);
        if let Some(table) = self.hash_table_mut(hash) {
            table.end_iteration();
        }
        match result? {
            Flow::Break(value) => Ok(value),
            Flow::Normal(_) => Ok(hash),
        }
    }

    fn hash_traverse(&mut self, env: &EnvRef, hash: Value, block: &BlockRef) -> EvalResult<Flow> {
        let mut cursor = self.hash_table(hash).and_then(|t| t.first());
        while let Some(slot) = cursor {
            let (key, value) = match self.hash_table(hash) {
                Some(t) => {
                    let entry = t.entry(slot);
                    (entry.key, entry.value)
                }
                None => break,
            };
            if let brk @ Flow::Break(_) = self.run_block(env, Some(block), &[key, value], None)? {
                return Ok(brk);
            }
            cursor = self.hash_table(hash).and_then(|t| t.successor(slot));
        }
        Ok(Flow::Normal(hash))
    }

    /// `Hash[...]`.
    pub fn hash_square_new(&mut self, env: &EnvRef, args: &[Value]) -> EvalResult {
        match args {
            [] => return Ok(self.make_hash()),
            [only] if self.is_hash(*only) => return Ok(*only),
            [only] if self.is_array(*only) => {
                let pairs = self.array(*only).map(<[Value]>::to_vec).unwrap_or_default();
                let hash = self.make_hash();
                for pair in pairs {
                    let Some(items) = self.array(pair).map(<[Value]>::to_vec) else {
                        return Err(self.error(env, DiagnosticKind::WrongHashElement));
                    };
                    let (key, value) = match items.as_slice() {
                        [key] => (*key, self.nil()),
                        [key, value] => (*key, *value),
                        _ => {
                            return Err(
                                self.error(env, DiagnosticKind::InvalidHashPairSize(items.len()))
                            );
                        }
                    };
                    self.hash_put(env, hash, key, value)?;
                }
                return Ok(hash);
            }
            _ => {}
        }
        if args.len() % 2 != 0 {
            return Err(self.error(env, DiagnosticKind::OddHashArguments));
        }
        let hash = self.make_hash();
        for pair in args.chunks_exact(2) {
            self.hash_put(env, hash, pair[0], pair[1])?;
        }
        Ok(hash)
    }

    /// `{k1=>v1, k2=>v2}` built from each key's and value's own `inspect`.
    pub fn hash_inspect(&mut self, env: &EnvRef, hash: Value) -> EvalResult<String> {
        let mut out = String::from("{");
        for (i, (key, value)) in self.hash_pairs(hash).into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.inspect(env, key)?);
            out.push_str("=>");
            out.push_str(&self.inspect(env, value)?);
        }
        out.push('}');
        Ok(out)
    }

    /// Equal sizes, and every key of `hash` maps to an `==` value in `other`.
    pub fn hash_equals(&mut self, env: &EnvRef, hash: Value, other: Value) -> EvalResult<bool> {
        if !self.is_hash(other) || self.hash_len(hash) != self.hash_len(other) {
            return Ok(false);
        }
        for (key, value) in self.hash_pairs(hash) {
            let Some(other_value) = self.hash_get(env, other, key)? else {
                return Ok(false);
            };
            if !self.values_equal(env, value, other_value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
