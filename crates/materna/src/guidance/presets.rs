//! Built-in rule sets: the antepartum catalog behind the provider-facing
//! assessment path and the conversational catalog behind patient triage
//! chat. Both go through the same validation as file-loaded catalogs.

use super::catalog::{CatalogValidationError, Rule, RuleCatalog};
use super::domain::{GuidanceCategory, Severity};
use super::predicate::{Comparator, Condition, ScalarValue};
use super::subject::fields;

pub fn antepartum_catalog() -> Result<RuleCatalog, CatalogValidationError> {
    RuleCatalog::new(antepartum_rules())
}

pub fn conversational_catalog() -> Result<RuleCatalog, CatalogValidationError> {
    RuleCatalog::new(conversational_rules())
}

fn at_least(field: &str, threshold: f64) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        op: Comparator::Ge,
        value: ScalarValue::Number(threshold),
    }
}

fn below(field: &str, threshold: f64) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        op: Comparator::Lt,
        value: ScalarValue::Number(threshold),
    }
}

fn flag_set(field: &str) -> Condition {
    Condition::Compare {
        field: field.to_string(),
        op: Comparator::Eq,
        value: ScalarValue::Flag(true),
    }
}

fn mentions(field: &str, needles: &[&str]) -> Condition {
    Condition::ContainsAny {
        field: field.to_string(),
        any_of: needles.iter().map(|needle| needle.to_string()).collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn antepartum_rules() -> Vec<Rule> {
    let elevated_bp = Condition::Any {
        conditions: vec![
            at_least(fields::SYSTOLIC_BP, 140.0),
            at_least(fields::DIASTOLIC_BP, 90.0),
        ],
    };

    vec![
        Rule {
            id: "bp_severe_hypertension".to_string(),
            category: GuidanceCategory::Hypertension,
            severity: Severity::Critical,
            condition: Condition::Any {
                conditions: vec![
                    at_least(fields::SYSTOLIC_BP, 160.0),
                    at_least(fields::DIASTOLIC_BP, 110.0),
                ],
            },
            recommendation: "Severe-range blood pressure. Confirm with a repeat reading within 15 \
                             minutes and start antihypertensive therapy if the elevation is \
                             sustained."
                .to_string(),
            medications: strings(&[
                "Labetalol 200 mg oral",
                "Nifedipine 10 mg immediate release",
            ]),
            tests: strings(&[
                "Repeat blood pressure in 15 minutes",
                "CBC with platelets",
                "Liver function panel",
                "Serum creatinine",
            ]),
            referral: Some("Labor and delivery triage, today".to_string()),
            citation: Some("ACOG Practice Bulletin No. 222".to_string()),
        },
        Rule {
            id: "bp_hypertension".to_string(),
            category: GuidanceCategory::Hypertension,
            severity: Severity::High,
            condition: elevated_bp.clone(),
            recommendation: "Blood pressure is in the hypertensive range. Recheck after five \
                             minutes of rest and review for pre-eclampsia warning signs."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&["Repeat blood pressure", "Urine protein screen"]),
            referral: None,
            citation: Some("ACOG Practice Bulletin No. 222".to_string()),
        },
        Rule {
            id: "preeclampsia_bp_proteinuria".to_string(),
            category: GuidanceCategory::Preeclampsia,
            severity: Severity::Critical,
            condition: Condition::All {
                conditions: vec![elevated_bp, flag_set(fields::PROTEINURIA)],
            },
            recommendation: "Hypertension with proteinuria meets pre-eclampsia criteria. Begin \
                             the full work-up today and do not wait for the next scheduled visit."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&[
                "CBC with platelets",
                "Liver function panel",
                "Serum creatinine",
                "24-hour urine protein or protein/creatinine ratio",
            ]),
            referral: Some("Maternal-fetal medicine consult".to_string()),
            citation: Some("ACOG Practice Bulletin No. 222".to_string()),
        },
        Rule {
            id: "preeclampsia_symptom_cluster".to_string(),
            category: GuidanceCategory::Preeclampsia,
            severity: Severity::High,
            condition: Condition::All {
                conditions: vec![
                    at_least(fields::GESTATIONAL_WEEK, 20.0),
                    mentions(
                        fields::ACTIVE_SYMPTOMS,
                        &[
                            "severe headache",
                            "blurred vision",
                            "visual disturbance",
                            "epigastric pain",
                            "sudden swelling",
                        ],
                    ),
                ],
            },
            recommendation: "Reported symptoms can signal pre-eclampsia after 20 weeks. Obtain a \
                             same-day blood pressure and urine protein check."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&["Blood pressure check", "Urine protein screen"]),
            referral: None,
            citation: Some("ACOG Practice Bulletin No. 222".to_string()),
        },
        Rule {
            id: "anemia_severe".to_string(),
            category: GuidanceCategory::Anemia,
            severity: Severity::High,
            condition: below(fields::HEMOGLOBIN_G_DL, 9.0),
            recommendation: "Hemoglobin is well below the pregnancy threshold. Evaluate for IV \
                             iron or transfusion and look for a bleeding source."
                .to_string(),
            medications: strings(&["IV iron sucrose per protocol"]),
            tests: strings(&["Ferritin", "Reticulocyte count", "Type and screen"]),
            referral: Some("Hematology consult".to_string()),
            citation: Some("ACOG Practice Bulletin No. 233".to_string()),
        },
        Rule {
            id: "anemia_iron_support".to_string(),
            category: GuidanceCategory::Anemia,
            severity: Severity::Medium,
            condition: below(fields::HEMOGLOBIN_G_DL, 11.0),
            recommendation: "Hemoglobin indicates anemia of pregnancy. Start oral iron with \
                             dietary counseling and recheck in four weeks."
                .to_string(),
            medications: strings(&["Ferrous sulfate 325 mg daily", "Prenatal vitamin with iron"]),
            tests: strings(&["Ferritin", "Repeat CBC in 4 weeks"]),
            referral: None,
            citation: Some("ACOG Practice Bulletin No. 233".to_string()),
        },
        Rule {
            id: "fetal_movement_reduced".to_string(),
            category: GuidanceCategory::FetalMovement,
            severity: Severity::High,
            condition: Condition::Any {
                conditions: vec![
                    below(fields::FETAL_MOVEMENT_COUNT, 10.0),
                    mentions(
                        fields::ACTIVE_SYMPTOMS,
                        &[
                            "decreased fetal movement",
                            "reduced fetal movement",
                            "no fetal movement",
                        ],
                    ),
                ],
            },
            recommendation: "Fewer than ten movements in the counting window needs follow-up. \
                             Perform a non-stress test the same day."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&["Non-stress test", "Biophysical profile if non-reactive"]),
            referral: Some("Labor and delivery triage if testing unavailable".to_string()),
            citation: Some("ACOG Practice Bulletin No. 229".to_string()),
        },
        Rule {
            id: "term_with_complication".to_string(),
            category: GuidanceCategory::GestationalTiming,
            severity: Severity::High,
            condition: Condition::All {
                conditions: vec![
                    at_least(fields::GESTATIONAL_WEEK, 37.0),
                    mentions(
                        fields::COMPLICATIONS,
                        &[
                            "pre-eclampsia",
                            "preeclampsia",
                            "gestational diabetes",
                            "placenta previa",
                            "growth restriction",
                            "cholestasis",
                        ],
                    ),
                ],
            },
            recommendation: "Term pregnancy with an active complication. Review delivery timing \
                             now rather than at the next routine visit."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&["Antepartum surveillance per complication protocol"]),
            referral: Some("Obstetric provider for delivery planning".to_string()),
            citation: None,
        },
        Rule {
            id: "postterm_surveillance".to_string(),
            category: GuidanceCategory::GestationalTiming,
            severity: Severity::Medium,
            condition: at_least(fields::GESTATIONAL_WEEK, 41.0),
            recommendation: "Pregnancy is past 41 weeks. Begin twice-weekly surveillance and \
                             discuss induction."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&["Non-stress test twice weekly", "Amniotic fluid index"]),
            referral: None,
            citation: Some("ACOG Practice Bulletin No. 146".to_string()),
        },
        Rule {
            id: "glucose_elevated".to_string(),
            category: GuidanceCategory::Nutrition,
            severity: Severity::Medium,
            condition: at_least(fields::BLOOD_GLUCOSE_MG_DL, 140.0),
            recommendation: "Glucose reading is above target. Reinforce the meal plan, review \
                             the glucose log, and screen for gestational diabetes if not yet \
                             done."
                .to_string(),
            medications: Vec::new(),
            tests: strings(&["Fasting glucose log", "3-hour glucose tolerance test if untested"]),
            referral: Some("Dietitian for medical nutrition therapy".to_string()),
            citation: Some("ACOG Practice Bulletin No. 190".to_string()),
        },
        Rule {
            id: "maternal_fever".to_string(),
            category: GuidanceCategory::General,
            severity: Severity::Medium,
            condition: at_least(fields::TEMPERATURE_C, 38.0),
            recommendation: "Temperature is 38C or higher. Look for an infectious source and \
                             treat fever promptly; sustained maternal fever is not benign in \
                             pregnancy."
                .to_string(),
            medications: strings(&["Acetaminophen 650 mg"]),
            tests: strings(&["Urinalysis with culture", "CBC"]),
            referral: None,
            citation: None,
        },
    ]
}

/// Keyword rule over the patient's message. `field` selects substring
/// matching on the retained phrase or exact membership in the token set.
fn keyword_rule(
    id: &str,
    category: GuidanceCategory,
    severity: Severity,
    field: &str,
    needles: &[&str],
    recommendation: &str,
    referral: Option<&str>,
) -> Rule {
    Rule {
        id: id.to_string(),
        category,
        severity,
        condition: mentions(field, needles),
        recommendation: recommendation.to_string(),
        medications: Vec::new(),
        tests: Vec::new(),
        referral: referral.map(|value| value.to_string()),
        citation: None,
    }
}

fn conversational_rules() -> Vec<Rule> {
    vec![
        keyword_rule(
            "triage_heavy_bleeding",
            GuidanceCategory::Emergency,
            Severity::Critical,
            fields::FREE_TEXT,
            &["bleeding", "blood clots", "soaked through"],
            "Vaginal bleeding in pregnancy needs urgent review. Call your provider now or go \
             to the nearest emergency department.",
            Some("Emergency department"),
        ),
        keyword_rule(
            "triage_fluid_leak",
            GuidanceCategory::Emergency,
            Severity::Critical,
            fields::FREE_TEXT,
            &["water broke", "waters broke", "leaking fluid", "gush of fluid"],
            "A gush or steady leak of fluid can mean your water has broken. Go to labor and \
             delivery now, even if you feel fine.",
            Some("Labor and delivery"),
        ),
        keyword_rule(
            "triage_severe_pain",
            GuidanceCategory::Emergency,
            Severity::Critical,
            fields::FREE_TEXT,
            &["severe pain", "severe cramping", "constant pain", "unbearable"],
            "Severe or constant abdominal pain is not normal at any stage. Seek emergency care \
             immediately.",
            Some("Emergency department"),
        ),
        keyword_rule(
            "triage_reduced_movement",
            GuidanceCategory::FetalMovement,
            Severity::High,
            fields::FREE_TEXT,
            &[
                "not moving",
                "no movement",
                "less movement",
                "fewer kicks",
                "decreased movement",
                "haven't felt",
                "hasn't moved",
                "hasnt moved",
            ],
            "Lie on your side and count movements for two hours. If you feel fewer than ten, \
             call your provider today for a non-stress test.",
            Some("Call your provider today"),
        ),
        keyword_rule(
            "triage_headache_vision",
            GuidanceCategory::Preeclampsia,
            Severity::High,
            fields::FREE_TEXT,
            &[
                "severe headache",
                "blurry vision",
                "blurred vision",
                "seeing spots",
                "vision changes",
            ],
            "A severe headache or vision changes can be a pre-eclampsia warning sign. Have \
             your blood pressure checked today.",
            Some("Same-day blood pressure check"),
        ),
        keyword_rule(
            "triage_contractions",
            GuidanceCategory::GestationalTiming,
            Severity::High,
            fields::FREE_TEXT,
            &["contractions", "regular tightening", "tightening every"],
            "Time your contractions from the start of one to the start of the next. Call your \
             provider if they come every five minutes or sooner, or if you are before 37 weeks.",
            None,
        ),
        keyword_rule(
            "triage_fever",
            GuidanceCategory::SymptomTriage,
            Severity::Medium,
            fields::FREE_TEXT_TOKENS,
            &["fever", "feverish", "temperature"],
            "Check your temperature. Above 38C (100.4F), call your provider today; fever in \
             pregnancy should be treated, not waited out.",
            None,
        ),
        keyword_rule(
            "triage_swelling",
            GuidanceCategory::Preeclampsia,
            Severity::Medium,
            fields::FREE_TEXT,
            &["swelling", "swollen hands", "swollen face", "swollen feet", "puffy"],
            "Gradual ankle swelling is common, but sudden swelling of the face or hands should \
             be checked with a blood pressure reading within a day.",
            None,
        ),
        keyword_rule(
            "triage_persistent_vomiting",
            GuidanceCategory::Nutrition,
            Severity::Medium,
            fields::FREE_TEXT,
            &[
                "can't keep anything down",
                "cant keep anything down",
                "vomiting all day",
                "throwing up everything",
            ],
            "If you cannot keep fluids down for 24 hours, call your provider; persistent \
             vomiting can cause dehydration that needs treatment.",
            Some("Call your provider if fluids stay down less than 24 hours"),
        ),
        keyword_rule(
            "triage_dizziness",
            GuidanceCategory::SymptomTriage,
            Severity::Low,
            fields::FREE_TEXT_TOKENS,
            &["dizzy", "dizziness", "lightheaded", "faint"],
            "Sit or lie on your left side and drink water. Mention it at your next visit; call \
             sooner if you actually faint or it keeps happening.",
            None,
        ),
        keyword_rule(
            "triage_back_pain",
            GuidanceCategory::SymptomTriage,
            Severity::Low,
            fields::FREE_TEXT,
            &["back pain", "backache", "back ache", "pelvic pressure"],
            "Back pain is common as pregnancy progresses. Try position changes, support \
             pillows, and warmth; call if it becomes rhythmic or comes in waves.",
            None,
        ),
        keyword_rule(
            "triage_morning_sickness",
            GuidanceCategory::Nutrition,
            Severity::Low,
            fields::FREE_TEXT,
            &["morning sickness", "nausea", "nauseous", "queasy"],
            "Small frequent meals, ginger, and vitamin B6 help most morning sickness. Tell \
             your provider if you start losing weight or cannot keep fluids down.",
            None,
        ),
        keyword_rule(
            "triage_heartburn",
            GuidanceCategory::Nutrition,
            Severity::Info,
            fields::FREE_TEXT,
            &["heartburn", "acid reflux", "indigestion"],
            "Smaller meals, staying upright after eating, and calcium-based antacids are safe \
             first steps for pregnancy heartburn.",
            None,
        ),
        keyword_rule(
            "triage_prenatal_nutrition",
            GuidanceCategory::Nutrition,
            Severity::Info,
            fields::FREE_TEXT,
            &["what should i eat", "prenatal vitamin", "vitamins", "folic acid"],
            "Keep taking a daily prenatal vitamin with folic acid, and aim for protein, whole \
             grains, and produce at each meal. Your provider can tailor this at your next \
             visit.",
            None,
        ),
    ]
}
