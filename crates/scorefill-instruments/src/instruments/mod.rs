pub mod beery;
pub mod champ;
pub mod wiat4;
pub mod wisc5;
