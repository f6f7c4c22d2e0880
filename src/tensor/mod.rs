pub mod precision;
pub mod tensor_record;
pub mod tensors_table;
