use crate::error::DecodeError;
use crate::stream::ByteStream;
use crate::symtab::SymbolTable;
use std::io::Read;

/// `extra_ints_needed` for each 4-bit representation code. Codes 1, 5 and 13
/// are reserved/undefined and fall through to the `_ => 0` arm.
fn extra_ints_needed(rep: u8) -> u8 {
    match rep {
        0 => 1,  // String
        2 => 1,  // Float32
        3 => 2,  // Float32Sigfigs
        4 => 2,  // OffsetLen
        6 => 2,  // Float32Precision
        7 => 3,  // Float32SigfigsPrecision
        8 => 1,  // Unsigned
        9 => 1,  // Signed
        10 => 1, // Float64
        11 => 2, // Float64Sigfigs
        12 => 3, // OffsetLenWithEncoding
        14 => 2, // Float64Precision
        15 => 0, // Float64SigfigsPrecision
        _ => 0,
    }
}

/// Read one metadata entry (`meta_key` plus its extra uvarints) and return
/// its `(field_index, value_index)` pairs, not yet resolved against the
/// strings table.
pub(crate) fn read_metadata_entry<R: Read>(
    stream: &mut ByteStream<R>,
    opcode: u8,
) -> Result<Vec<(u64, u64)>, DecodeError> {
    let mut meta_key = stream.read_uvarint()?;

    let (field_index, num_to_read) = if opcode <= 2 {
        meta_key <<= 3;
        (meta_key >> 4, 1u8)
    } else {
        if opcode < 36 {
            meta_key <<= 2;
        }
        let rep = (meta_key & 0xF) as u8;
        (meta_key >> 4, extra_ints_needed(rep))
    };

    let mut pairs = Vec::with_capacity(num_to_read as usize);
    for _ in 0..num_to_read {
        let value_index = stream.read_uvarint()?;
        pairs.push((field_index, value_index));
    }
    Ok(pairs)
}

/// Resolve a `(field_index, value_index)` pair against the strings table.
/// An out-of-range index is a non-fatal lookup failure: the pair is
/// reported with a sentinel rather than aborting the event.
pub(crate) fn resolve_pair(strings: &SymbolTable, field_index: u64, value_index: u64) -> (String, String) {
    match (strings.get(field_index), strings.get(value_index)) {
        (Some(field), Some(value)) => (field.to_string(), value.to_string()),
        _ => (
            "<error>".to_string(),
            format!("index out of range (field_index={field_index}, value_index={value_index})"),
        ),
    }
}
