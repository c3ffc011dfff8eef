mod stream;
mod value;
