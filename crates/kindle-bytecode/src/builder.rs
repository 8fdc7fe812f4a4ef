//! Bytecode array builder
//!
//! The generator walks a function top-down and calls one emission method per
//! instruction, in program order. Each method validates its operands, appends
//! the encoded instruction and returns the builder for chaining. Every misuse
//! is a bug in the generator and panics; nothing here returns an error.

use crate::bytecode_array::BytecodeArray;
use crate::bytecodes::{Bytecode, OperandType};
use crate::constant_pool::{ConstantPoolBuilder, MAX_CONSTANT_INDEX};
use crate::frame::FrameLayout;
use crate::register::Register;
use crate::temporary::TemporaryRegisterAllocator;
use crate::token::Token;
use kindle_types::{Factory, Handle, Smi};
use tracing::{debug, trace};

/// Builds the bytecode array for a single function
#[derive(Debug)]
pub struct BytecodeArrayBuilder<'f> {
    factory: &'f Factory,
    layout: FrameLayout,

    /// Encoded instructions
    bytecodes: Vec<u8>,

    constants: ConstantPoolBuilder,

    parameter_count: Option<usize>,
    locals_count: Option<usize>,

    temporaries: TemporaryRegisterAllocator,
}

impl<'f> BytecodeArrayBuilder<'f> {
    /// Create a builder using the default frame layout
    pub fn new(factory: &'f Factory) -> Self {
        Self::with_layout(factory, FrameLayout::default())
    }

    pub fn with_layout(factory: &'f Factory, layout: FrameLayout) -> Self {
        Self {
            factory,
            layout,
            bytecodes: Vec::new(),
            constants: ConstantPoolBuilder::new(),
            parameter_count: None,
            locals_count: None,
            temporaries: TemporaryRegisterAllocator::default(),
        }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Set the number of parameters the function expects, receiver included
    pub fn set_parameter_count(&mut self, parameter_count: usize) -> &mut Self {
        let receiver_index =
            self.layout.last_param_register_index as i64 - parameter_count as i64 + 1;
        assert!(
            parameter_count == 0 || receiver_index >= Register::MIN_INDEX as i64,
            "{} parameters do not fit below the register file",
            parameter_count
        );
        self.parameter_count = Some(parameter_count);
        self
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
            .unwrap_or_else(|| panic!("parameter count has not been set"))
    }

    /// Set the number of locals; temporaries are allocated after them
    pub fn set_locals_count(&mut self, locals_count: usize) -> &mut Self {
        assert!(
            locals_count <= Register::MAX_INDEX as usize + 1,
            "{} locals do not fit in the register file",
            locals_count
        );
        self.temporaries.reset(locals_count as i32);
        self.locals_count = Some(locals_count);
        self
    }

    pub fn locals_count(&self) -> usize {
        self.locals_count
            .unwrap_or_else(|| panic!("locals count has not been set"))
    }

    /// Register holding parameter `index`; parameter 0 is the receiver
    pub fn parameter(&self, index: usize) -> Register {
        self.layout.parameter(index, self.parameter_count())
    }

    /// Number of constants added so far
    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    /// Load a literal into the accumulator.
    ///
    /// Smis go through `load_smi`; everything else is loaded from the
    /// constant pool.
    pub fn load_literal(&mut self, literal: &Handle) -> &mut Self {
        match literal.as_smi() {
            Some(smi) => self.load_smi(smi),
            None => self.load_constant(literal),
        }
    }

    /// Load a small integer, using an immediate when it fits in 8 bits
    pub fn load_smi(&mut self, smi: impl Into<Smi>) -> &mut Self {
        let smi = smi.into();
        let raw = smi.value();
        if raw == 0 {
            self.output(Bytecode::LdaZero, &[]);
        } else if (i8::MIN as i32..=i8::MAX as i32).contains(&raw) {
            self.output(Bytecode::LdaSmi8, &[raw as i8 as u8]);
        } else {
            self.load_constant(&Handle::from(smi));
        }
        self
    }

    fn load_constant(&mut self, object: &Handle) -> &mut Self {
        let entry = self.constant_pool_entry(object);
        if entry > MAX_CONSTANT_INDEX {
            unimplemented!("constant pool index {} does not fit in an Idx operand", entry);
        }
        self.output(Bytecode::LdaConstant, &[entry as u8]);
        self
    }

    pub fn load_undefined(&mut self) -> &mut Self {
        self.output(Bytecode::LdaUndefined, &[]);
        self
    }

    pub fn load_null(&mut self) -> &mut Self {
        self.output(Bytecode::LdaNull, &[]);
        self
    }

    pub fn load_the_hole(&mut self) -> &mut Self {
        self.output(Bytecode::LdaTheHole, &[]);
        self
    }

    pub fn load_true(&mut self) -> &mut Self {
        self.output(Bytecode::LdaTrue, &[]);
        self
    }

    pub fn load_false(&mut self) -> &mut Self {
        self.output(Bytecode::LdaFalse, &[]);
        self
    }

    pub fn load_boolean(&mut self, value: bool) -> &mut Self {
        if value {
            self.load_true()
        } else {
            self.load_false()
        }
    }

    pub fn load_accumulator_with_register(&mut self, reg: Register) -> &mut Self {
        self.output(Bytecode::Ldar, &[reg.to_operand()]);
        self
    }

    pub fn store_accumulator_in_register(&mut self, reg: Register) -> &mut Self {
        self.output(Bytecode::Star, &[reg.to_operand()]);
        self
    }

    /// `acc = reg <op> acc`
    pub fn binary_operation(&mut self, op: Token, reg: Register) -> &mut Self {
        let bytecode = Self::bytecode_for_binary_operation(op);
        self.output(bytecode, &[reg.to_operand()]);
        self
    }

    /// Return the accumulator
    pub fn ret(&mut self) -> &mut Self {
        self.output(Bytecode::Return, &[]);
        self
    }

    /// Package the function. Consumes the builder, so nothing can be emitted
    /// afterwards.
    pub fn finalize(self) -> BytecodeArray {
        let parameter_count = self.parameter_count();
        let locals_count = self.locals_count();
        assert_eq!(
            self.temporaries.outstanding(),
            0,
            "temporary registers still borrowed at finalize"
        );

        let register_count = locals_count + self.temporaries.max_outstanding() as usize;
        let frame_size = self.layout.frame_size(register_count);

        debug!(
            length = self.bytecodes.len(),
            register_count,
            frame_size,
            constants = self.constants.len(),
            "finalized bytecode array"
        );

        BytecodeArray::new(
            self.bytecodes.into_boxed_slice(),
            frame_size,
            register_count,
            parameter_count,
            self.constants.finish(),
        )
    }

    fn bytecode_for_binary_operation(op: Token) -> Bytecode {
        match op.binary_operation_bytecode() {
            Some(bytecode) => bytecode,
            None => unimplemented!("binary operation {}", op),
        }
    }

    fn constant_pool_entry(&mut self, object: &Handle) -> usize {
        // Oddballs have dedicated load bytecodes.
        assert!(
            !self.factory.is_root(object),
            "{} must not be added to the constant pool",
            object
        );
        self.constants.insert(object)
    }

    pub(crate) fn borrow_temporary_register(&mut self) -> i32 {
        assert!(self.locals_count.is_some(), "locals count has not been set");
        let index = self.temporaries.borrow_register();
        assert!(
            index <= Register::MAX_INDEX,
            "out of temporary registers"
        );
        index
    }

    pub(crate) fn return_temporary_register(&mut self, index: i32) {
        self.temporaries.return_register(index);
    }

    pub(crate) fn next_temporary_register(&self) -> i32 {
        self.temporaries.next()
    }

    pub(crate) fn rewind_temporary_registers(&mut self, index: i32) {
        self.temporaries.rewind(index);
    }

    fn operand_is_valid(&self, bytecode: Bytecode, operand_index: usize, operand: u8) -> bool {
        match bytecode.operand_type(operand_index) {
            OperandType::None => false,
            OperandType::Imm8 => true,
            OperandType::Idx => (operand as usize) < self.constants.len(),
            OperandType::Reg => {
                let index = Register::from_operand(operand).index();
                (index >= 0 && index < self.temporaries.next())
                    || self
                        .layout
                        .is_parameter_index(index, self.parameter_count.unwrap_or(0))
            }
        }
    }

    /// Append `bytecode` and its operand bytes after validating them
    fn output(&mut self, bytecode: Bytecode, operands: &[u8]) {
        assert_eq!(
            bytecode.number_of_operands(),
            operands.len(),
            "{} takes {} operands",
            bytecode,
            bytecode.number_of_operands()
        );
        for (i, &operand) in operands.iter().enumerate() {
            assert!(
                self.operand_is_valid(bytecode, i, operand),
                "invalid {} operand {} ({:#04x}) for {}",
                bytecode.operand_type(i).name(),
                i,
                operand,
                bytecode
            );
        }

        trace!(offset = self.bytecodes.len(), %bytecode, ?operands, "emit");
        self.bytecodes.push(bytecode.to_byte());
        self.bytecodes.extend_from_slice(operands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporary::TemporaryRegisterScope;

    fn builder(factory: &Factory) -> BytecodeArrayBuilder<'_> {
        let mut builder = BytecodeArrayBuilder::new(factory);
        builder.set_parameter_count(1).set_locals_count(0);
        builder
    }

    #[test]
    fn test_all_load_bytecodes() {
        let factory = Factory::new();
        let mut b = builder(&factory);
        b.load_undefined()
            .load_null()
            .load_the_hole()
            .load_true()
            .load_false()
            .load_boolean(true)
            .ret();
        let array = b.finalize();
        assert_eq!(
            array.bytecodes(),
            &[
                Bytecode::LdaUndefined.to_byte(),
                Bytecode::LdaNull.to_byte(),
                Bytecode::LdaTheHole.to_byte(),
                Bytecode::LdaTrue.to_byte(),
                Bytecode::LdaFalse.to_byte(),
                Bytecode::LdaTrue.to_byte(),
                Bytecode::Return.to_byte(),
            ]
        );
    }

    #[test]
    fn test_smi_encoding_boundaries() {
        let factory = Factory::new();
        let mut b = builder(&factory);
        b.load_smi(-128).load_smi(127).load_smi(128).load_smi(-129);
        let array = b.finalize();
        assert_eq!(
            array.bytecodes(),
            &[
                Bytecode::LdaSmi8.to_byte(),
                0x80,
                Bytecode::LdaSmi8.to_byte(),
                0x7f,
                Bytecode::LdaConstant.to_byte(),
                0,
                Bytecode::LdaConstant.to_byte(),
                1,
            ]
        );
        assert_eq!(array.constant_pool()[0].as_smi(), Some(Smi::from_int(128)));
        assert_eq!(array.constant_pool()[1].as_smi(), Some(Smi::from_int(-129)));
    }

    #[test]
    fn test_locals_then_temporaries() {
        let factory = Factory::new();
        let mut b = BytecodeArrayBuilder::new(&factory);
        b.set_parameter_count(1).set_locals_count(2);
        {
            let mut scope = TemporaryRegisterScope::new(&mut b);
            assert_eq!(scope.new_register().index(), 2);
            assert_eq!(scope.new_register().index(), 3);
        }
        b.load_undefined().ret();
        let array = b.finalize();
        assert_eq!(array.register_count(), 4);
        assert_eq!(array.frame_size(), 32);
    }

    #[test]
    fn test_parameters() {
        let factory = Factory::new();
        let mut b = BytecodeArrayBuilder::new(&factory);
        b.set_parameter_count(3).set_locals_count(0);
        assert_eq!(b.parameter(0).index(), -7);
        assert_eq!(b.parameter(2).index(), -5);
        b.load_accumulator_with_register(b.parameter(1)).ret();
        assert_eq!(b.finalize().bytecodes(), &[Bytecode::Ldar.to_byte(), 6, Bytecode::Return.to_byte()]);
    }

    #[test]
    fn test_custom_layout() {
        let factory = Factory::new();
        let layout = FrameLayout {
            slot_size: 4,
            last_param_register_index: -2,
        };
        let mut b = BytecodeArrayBuilder::with_layout(&factory, layout);
        b.set_parameter_count(2).set_locals_count(3);
        assert_eq!(b.parameter(0).index(), -3);
        b.ret();
        assert_eq!(b.finalize().frame_size(), 12);
    }

    #[test]
    #[should_panic(expected = "binary operation")]
    fn test_unsupported_operator() {
        let factory = Factory::new();
        let mut b = BytecodeArrayBuilder::new(&factory);
        b.set_parameter_count(1).set_locals_count(1);
        b.binary_operation(Token::BitOr, Register::new(0));
    }

    #[test]
    #[should_panic(expected = "invalid Reg operand")]
    fn test_register_outside_frame() {
        let factory = Factory::new();
        let mut b = builder(&factory);
        b.store_accumulator_in_register(Register::new(0));
    }

    #[test]
    #[should_panic(expected = "invalid Reg operand")]
    fn test_released_temporary_is_invalid() {
        let factory = Factory::new();
        let mut b = builder(&factory);
        let reg = {
            let mut scope = TemporaryRegisterScope::new(&mut b);
            scope.new_register()
        };
        b.load_accumulator_with_register(reg);
    }

    #[test]
    #[should_panic(expected = "must not be added to the constant pool")]
    fn test_oddball_rejected_by_pool() {
        let factory = Factory::new();
        let mut b = builder(&factory);
        b.load_literal(&factory.null_value());
    }

    #[test]
    #[should_panic(expected = "parameter count has not been set")]
    fn test_finalize_requires_parameter_count() {
        let factory = Factory::new();
        let mut b = BytecodeArrayBuilder::new(&factory);
        b.set_locals_count(0);
        b.finalize();
    }

    #[test]
    #[should_panic(expected = "locals count has not been set")]
    fn test_finalize_requires_locals_count() {
        let factory = Factory::new();
        let mut b = BytecodeArrayBuilder::new(&factory);
        b.set_parameter_count(1);
        b.finalize();
    }

    #[test]
    #[should_panic(expected = "does not fit in an Idx operand")]
    fn test_constant_pool_overflow() {
        let factory = Factory::new();
        let mut b = builder(&factory);
        for i in 0..=256 {
            b.load_literal(&factory.new_heap_number(i as f64));
        }
    }

    #[test]
    #[should_panic(expected = "do not fit below the register file")]
    fn test_too_many_parameters() {
        let factory = Factory::new();
        let mut b = BytecodeArrayBuilder::new(&factory);
        b.set_parameter_count(124);
    }
}
