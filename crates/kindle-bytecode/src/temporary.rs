//! Temporary register allocation
//!
//! Temporaries are lent out above the locals in stack order and returned when
//! the `TemporaryRegisterScope` that borrowed them is dropped. Expression
//! evaluation is tree shaped, so a stack is enough and keeps the frame as
//! small as the deepest evaluation path.

use crate::builder::BytecodeArrayBuilder;
use crate::register::Register;
use std::ops::{Deref, DerefMut};

/// Stack allocator state owned by the builder
#[derive(Debug, Default)]
pub(crate) struct TemporaryRegisterAllocator {
    /// Index of the first temporary (the locals count)
    first: i32,

    /// Next index to hand out
    next: i32,

    /// Highest number of temporaries ever outstanding at once
    max_outstanding: i32,
}

impl TemporaryRegisterAllocator {
    /// Move the temporaries to start after `locals_count` locals
    pub(crate) fn reset(&mut self, locals_count: i32) {
        assert_eq!(
            self.next, self.first,
            "locals count changed while {} temporaries are outstanding",
            self.outstanding()
        );
        self.first = locals_count;
        self.next = locals_count;
    }

    pub(crate) fn borrow_register(&mut self) -> i32 {
        let index = self.next;
        self.next += 1;
        self.max_outstanding = self.max_outstanding.max(self.outstanding());
        index
    }

    pub(crate) fn return_register(&mut self, index: i32) {
        assert_eq!(
            index,
            self.next - 1,
            "temporary r{} returned out of order (next free is r{})",
            index,
            self.next
        );
        self.next = index;
    }

    /// First index not lent out
    pub(crate) fn next(&self) -> i32 {
        self.next
    }

    /// Release every temporary from `index` upwards without checking order
    pub(crate) fn rewind(&mut self, index: i32) {
        if index < self.next {
            self.next = index.max(self.first);
        }
    }

    pub(crate) fn outstanding(&self) -> i32 {
        self.next - self.first
    }

    pub(crate) fn max_outstanding(&self) -> i32 {
        self.max_outstanding
    }
}

/// Scope that lends temporary registers and returns them all when dropped.
///
/// The scope mutably borrows the builder (or an enclosing scope) and derefs
/// to the builder, so bytecode is emitted through the innermost scope and an
/// outer scope cannot be closed while an inner one is alive.
///
/// ```
/// use kindle_bytecode::{BytecodeArrayBuilder, TemporaryRegisterScope, Token};
/// use kindle_types::Factory;
///
/// let factory = Factory::new();
/// let mut builder = BytecodeArrayBuilder::new(&factory);
/// builder.set_parameter_count(1).set_locals_count(0);
/// {
///     let mut scope = TemporaryRegisterScope::new(&mut builder);
///     let lhs = scope.new_register();
///     scope
///         .load_smi(2)
///         .store_accumulator_in_register(lhs)
///         .load_smi(3)
///         .binary_operation(Token::Add, lhs);
/// }
/// builder.ret();
/// assert_eq!(builder.finalize().register_count(), 1);
/// ```
pub struct TemporaryRegisterScope<'b, 'f> {
    builder: &'b mut BytecodeArrayBuilder<'f>,
    count: usize,
    last_register_index: i32,

    /// Free index when the scope opened; unwinding rewinds to it
    first_register_index: i32,
}

impl<'b, 'f> TemporaryRegisterScope<'b, 'f> {
    pub fn new(builder: &'b mut BytecodeArrayBuilder<'f>) -> Self {
        let first_register_index = builder.next_temporary_register();
        Self {
            builder,
            count: 0,
            last_register_index: -1,
            first_register_index,
        }
    }

    /// Borrow the next free temporary for the lifetime of this scope
    pub fn new_register(&mut self) -> Register {
        self.last_register_index = self.builder.borrow_temporary_register();
        self.count += 1;
        Register::new(self.last_register_index)
    }

    /// Number of temporaries this scope holds
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<'f> Deref for TemporaryRegisterScope<'_, 'f> {
    type Target = BytecodeArrayBuilder<'f>;

    fn deref(&self) -> &Self::Target {
        self.builder
    }
}

impl<'f> DerefMut for TemporaryRegisterScope<'_, 'f> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.builder
    }
}

impl Drop for TemporaryRegisterScope<'_, '_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            // No order checks while unwinding: a second panic would abort.
            self.builder
                .rewind_temporary_registers(self.first_register_index);
            return;
        }
        while self.count != 0 {
            self.builder.return_temporary_register(self.last_register_index);
            self.last_register_index -= 1;
            self.count -= 1;
        }
    }
}
