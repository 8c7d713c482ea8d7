//! Categorical values accepted by the intake forms and the checkout.

use super::validation::Choice;
use serde::{Deserialize, Serialize};

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl Choice for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice!(Industry {
    Technology => "technology",
    Healthcare => "healthcare",
    Education => "education",
    Finance => "finance",
    Ecommerce => "ecommerce",
    Other => "other",
});

choice!(Stage {
    Idea => "idea",
    Prototype => "prototype",
    Revenue => "revenue",
    Scaling => "scaling",
});

choice!(
    /// Whether the startup has raised money already.
    Funding {
        Yes => "yes",
        No => "no",
    }
);

choice!(
    /// Headcount bracket asked by the self-evaluation form.
    TeamSize {
        Solo => "solo",
        TwoToFive => "2-5",
        SixToTen => "6-10",
        ElevenPlus => "11+",
    }
);

choice!(
    /// Team shape asked by the mentorship application.
    TeamShape {
        Solo => "solo",
        CoFounders => "co-founders",
        Small => "small-team",
        Medium => "medium-team",
        Large => "large-team",
    }
);

choice!(Challenge {
    Funding => "funding",
    Product => "product",
    Marketing => "marketing",
    Team => "team",
    Scaling => "scaling",
    Other => "other",
});

choice!(
    /// Specialty of the expert a consultation is booked with.
    Consultant {
        Marketing => "marketing",
        Finance => "finance",
        Technology => "technology",
        Business => "business",
    }
);

choice!(TimeSlot {
    TenAm => "10:00",
    ElevenAm => "11:00",
    Noon => "12:00",
    TwoPm => "14:00",
    ThreePm => "15:00",
    FourPm => "16:00",
});

choice!(
    /// Product tier a payment is made for.
    ServiceType {
        SelfEvaluation => "self-evaluation",
        Consultancy => "consultancy",
        Mentorship => "mentorship",
    }
);
