use crate::Instrument;

/// Beery VMI: Beery-Buktenica Developmental Test of Visual-Motor
/// Integration. Entered by hand.
pub struct Beery;

impl Instrument for Beery {
    fn id(&self) -> &str {
        "beery"
    }

    fn name(&self) -> &str {
        "Beery VMI"
    }

    fn subtests(&self) -> &[&'static str] {
        &["Visual Motor Integration", "Visual Perception", "Motor Coordination"]
    }
}
