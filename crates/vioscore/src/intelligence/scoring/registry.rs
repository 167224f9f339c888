/// Direction a raw indicator contributes to well-being. Inverted terms are
/// folded in as `1 - value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Inverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaTerm {
    pub attribute: &'static str,
    pub polarity: Polarity,
}

/// Scoring recipe for one category: the score is the mean over all terms of
/// the polarity-adjusted indicator, scaled to 0..=1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFormula {
    pub category: &'static str,
    pub terms: &'static [FormulaTerm],
}

const fn positive(attribute: &'static str) -> FormulaTerm {
    FormulaTerm {
        attribute,
        polarity: Polarity::Positive,
    }
}

const fn inverted(attribute: &'static str) -> FormulaTerm {
    FormulaTerm {
        attribute,
        polarity: Polarity::Inverted,
    }
}

/// Every category with a defined scoring recipe. Categories absent from this
/// registry are skipped without error. The term lists are fixed; they do not
/// follow the schema's attribute membership, which carries extra columns for
/// some categories.
pub const FORMULAS: &[CategoryFormula] = &[
    CategoryFormula {
        category: "drinking",
        terms: &[
            positive("meets_alcohol_guideline"),
            inverted("drinker"),
            inverted("heavy_drinker"),
            inverted("excessive_drinker"),
        ],
    },
    CategoryFormula {
        category: "weight",
        terms: &[
            inverted("underweight"),
            positive("normal_weight"),
            inverted("overweight"),
            inverted("severe_obesity"),
        ],
    },
    CategoryFormula {
        category: "smoker",
        terms: &[inverted("smoker")],
    },
    CategoryFormula {
        category: "physical_activity",
        terms: &[
            positive("meets_exercise_guideline"),
            positive("weekly_athletes"),
        ],
    },
    CategoryFormula {
        category: "physical_health",
        terms: &[
            positive("good_perceived_health"),
            inverted("prolonged_illness_and_limited"),
        ],
    },
    CategoryFormula {
        category: "impairment",
        terms: &[
            inverted("one_or_more_long_term_conditions"),
            inverted("restricted_due_to_health"),
            inverted("severely_restricted_due_to_health"),
            inverted("hearing_impairment"),
            inverted("face_restriction"),
            inverted("mobility_restriction"),
            inverted("one_or_more_physical_limitations"),
        ],
    },
    CategoryFormula {
        category: "loneliness",
        terms: &[
            inverted("lonely"),
            inverted("severely_or_very_seriously_lonely"),
        ],
    },
    CategoryFormula {
        category: "caregiving",
        terms: &[positive("volunteer_work"), positive("caregiver")],
    },
    CategoryFormula {
        category: "stress",
        terms: &[
            positive("moderate_or_much_control_over_own_life"),
            inverted("difficulty_getting_around"),
            inverted("serious_noise_nuisance_from_neighbours"),
        ],
    },
];

pub fn formula_for(category: &str) -> Option<&'static CategoryFormula> {
    FORMULAS
        .iter()
        .find(|formula| formula.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_reference_categories() {
        for category in [
            "drinking",
            "weight",
            "smoker",
            "physical_activity",
            "physical_health",
            "impairment",
            "loneliness",
            "caregiving",
            "stress",
        ] {
            assert!(
                formula_for(category).is_some(),
                "missing formula for {category}"
            );
        }
        assert!(formula_for("greenery").is_none());
    }

    #[test]
    fn impairment_folds_seven_indicators() {
        let formula = formula_for("impairment").expect("impairment registered");
        assert_eq!(formula.terms.len(), 7);
        assert!(formula
            .terms
            .iter()
            .all(|term| term.polarity == Polarity::Inverted));
    }
}
