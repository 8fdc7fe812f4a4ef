//! Operator tokens handed over by the generator

use crate::bytecodes::Bytecode;
use std::fmt;

/// Binary operator token as produced by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Sar,
    Shr,
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Comma,
}

impl Token {
    pub fn symbol(self) -> &'static str {
        match self {
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Div => "/",
            Token::Mod => "%",
            Token::BitOr => "|",
            Token::BitXor => "^",
            Token::BitAnd => "&",
            Token::Shl => "<<",
            Token::Sar => ">>",
            Token::Shr => ">>>",
            Token::Eq => "==",
            Token::Ne => "!=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Comma => ",",
        }
    }

    /// Bytecode implementing this operator, if the interpreter has one
    pub fn binary_operation_bytecode(self) -> Option<Bytecode> {
        match self {
            Token::Add => Some(Bytecode::Add),
            Token::Sub => Some(Bytecode::Sub),
            Token::Mul => Some(Bytecode::Mul),
            Token::Div => Some(Bytecode::Div),
            Token::Mod => Some(Bytecode::Mod),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_tokens_map() {
        assert_eq!(Token::Add.binary_operation_bytecode(), Some(Bytecode::Add));
        assert_eq!(Token::Sub.binary_operation_bytecode(), Some(Bytecode::Sub));
        assert_eq!(Token::Mul.binary_operation_bytecode(), Some(Bytecode::Mul));
        assert_eq!(Token::Div.binary_operation_bytecode(), Some(Bytecode::Div));
        assert_eq!(Token::Mod.binary_operation_bytecode(), Some(Bytecode::Mod));
    }

    #[test]
    fn test_other_tokens_unsupported() {
        assert_eq!(Token::BitOr.binary_operation_bytecode(), None);
        assert_eq!(Token::Lt.binary_operation_bytecode(), None);
        assert_eq!(Token::Comma.binary_operation_bytecode(), None);
    }
}
