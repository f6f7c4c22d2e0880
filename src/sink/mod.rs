pub mod tensor_dump;
