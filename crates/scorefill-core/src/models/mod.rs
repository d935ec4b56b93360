pub mod lookup;
pub mod score;
pub mod template;
