use crate::Instrument;

/// ChAMP: Child and Adolescent Memory Profile. Entered by hand.
pub struct Champ;

impl Instrument for Champ {
    fn id(&self) -> &str {
        "champ"
    }

    fn name(&self) -> &str {
        "ChAMP"
    }

    fn subtests(&self) -> &[&'static str] {
        &[
            "Lists",
            "Objects",
            "Instructions",
            "Places",
            "Lists Delayed",
            "Objects Delayed",
            "Instructions Delayed",
            "Places Delayed",
            "Verbal Memory Index",
            "Visual Memory Index",
            "Immediate Memory Index",
            "Delayed Memory Index",
            "Total Memory Index",
            "Screening Index",
        ]
    }
}
