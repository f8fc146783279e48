pub mod frankfurter;
pub mod naver;
