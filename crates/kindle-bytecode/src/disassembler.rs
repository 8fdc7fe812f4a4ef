//! Human-readable listings of bytecode arrays

use crate::bytecode_array::BytecodeArray;
use crate::decoder::{Instruction, Operand};
use std::fmt::Write;

/// Render `array` as a listing: header, one line per instruction, then the
/// constant pool.
///
/// ```text
/// Parameter count 1
/// Register count 1
/// Frame size 8
///    0 : LdaConstant [0]  ; 1234
///    2 : Star r0
///    4 : Return
/// Constant pool (size = 1)
///    0 : 1234
/// ```
pub fn disassemble(array: &BytecodeArray) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_listing(&mut out, array);
    out
}

fn write_listing(out: &mut String, array: &BytecodeArray) -> std::fmt::Result {
    writeln!(out, "Parameter count {}", array.parameter_count())?;
    writeln!(out, "Register count {}", array.register_count())?;
    writeln!(out, "Frame size {}", array.frame_size())?;

    for decoded in array.instructions() {
        match decoded {
            Ok(instruction) => {
                write!(out, "{:4} : {}", instruction.offset, instruction)?;
                if let Some(comment) = constant_comment(array, &instruction) {
                    write!(out, "  ; {}", comment)?;
                }
                writeln!(out)?;
            }
            Err(e) => writeln!(out, "  ?? : {}", e)?,
        }
    }

    writeln!(out, "Constant pool (size = {})", array.constant_pool().len())?;
    for (i, constant) in array.constant_pool().iter().enumerate() {
        writeln!(out, "{:4} : {}", i, constant)?;
    }
    Ok(())
}

fn constant_comment(array: &BytecodeArray, instruction: &Instruction<'_>) -> Option<String> {
    instruction.operands().find_map(|operand| match operand {
        Operand::Idx(index) => Some(
            array
                .constant(index as usize)
                .map(|c| c.to_string())
                .unwrap_or_else(|| "???".to_string()),
        ),
        _ => None,
    })
}
