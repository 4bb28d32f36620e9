//! # Inflector
//!
//! Pure, deterministic word transformations used to map caller action names to remote
//! operation names and to guess the wrapper element names of a response.
//!
//! Singularization and pluralization use an ordered rule table: the first rule whose pattern
//! matches wins. Only the last `_`-separated segment of a snake_case name is inflected, so
//! `sub_id_statistics` singularizes to `sub_id_statistic`.
use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::LazyLock;

/// Words that have no distinct singular and plural forms.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "jeans",
    "money",
    "police",
    "rice",
    "series",
    "sheep",
    "species",
];

/// `(singular, plural)` pairs that no rule covers.
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("man", "men"),
    ("move", "moves"),
    ("person", "people"),
    ("sex", "sexes"),
    ("zombie", "zombies"),
];

static SINGULAR_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile_rules(&[
        (r"(database)s$", "$1"),
        (r"(quiz)zes$", "$1"),
        (r"(matr)ices$", "${1}ix"),
        (r"(vert|ind)ices$", "${1}ex"),
        (r"^(ox)en$", "$1"),
        (r"(alias|status)(es)?$", "$1"),
        (r"(octop|vir)(us|i)$", "${1}us"),
        (r"^(a)x[ie]s$", "${1}xis"),
        (r"(cris|test)(is|es)$", "${1}is"),
        (r"(shoe)s$", "$1"),
        (r"(o)es$", "$1"),
        (r"(bus)(es)?$", "$1"),
        (r"^(m|l)ice$", "${1}ouse"),
        (r"(x|ch|ss|sh)es$", "$1"),
        (r"(m)ovies$", "${1}ovie"),
        (r"(s)eries$", "${1}eries"),
        (r"([^aeiouy]|qu)ies$", "${1}y"),
        (r"([lr])ves$", "${1}f"),
        (r"(tive)s$", "$1"),
        (r"(hive)s$", "$1"),
        (r"([^f])ves$", "${1}fe"),
        (r"^(analy)(sis|ses)$", "${1}sis"),
        (
            r"((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        (r"([ti])a$", "${1}um"),
        (r"(n)ews$", "${1}ews"),
        (r"(ss)$", "$1"),
        (r"s$", ""),
    ])
});

static PLURAL_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile_rules(&[
        (r"(quiz)$", "${1}zes"),
        (r"^(oxen)$", "$1"),
        (r"^(ox)$", "${1}en"),
        (r"^(m|l)ice$", "${1}ice"),
        (r"^(m|l)ouse$", "${1}ice"),
        (r"(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(x|ch|ss|sh)$", "${1}es"),
        (r"([^aeiouy]|qu)y$", "${1}ies"),
        (r"(hive)$", "${1}s"),
        (r"(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"sis$", "ses"),
        (r"([ti])a$", "${1}a"),
        (r"([ti])um$", "${1}a"),
        (r"(buffal|tomat)o$", "${1}oes"),
        (r"(bu)s$", "${1}ses"),
        (r"(alias|status)$", "${1}es"),
        (r"(octop|vir)(?:us|i)$", "${1}i"),
        (r"^(ax|test)is$", "${1}es"),
        (r"s$", "s"),
        (r"$", "s"),
    ])
});

fn compile_rules(rules: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .map(|(pattern, replacement)| {
            let regex = Regex::new(pattern).expect("valid inflection rule");
            (regex, *replacement)
        })
        .collect()
}

/// Converts a snake_case name into PascalCase (e.g. `get_payments` -> `GetPayments`).
pub fn camelize(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Converts a PascalCase or camelCase name into snake_case (e.g. `GetPaymentsResult` ->
/// `get_payments_result`).
pub fn underscore(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Returns the singular form of the last segment of `word`.
pub fn singularize(word: &str) -> String {
    inflect_last_segment(word, |segment| {
        IRREGULAR
            .iter()
            .find(|(_, plural)| *plural == segment)
            .map(|(singular, _)| (*singular).to_string())
            .unwrap_or_else(|| apply_rules(&SINGULAR_RULES, segment))
    })
}

/// Returns the plural form of the last segment of `word`.
pub fn pluralize(word: &str) -> String {
    inflect_last_segment(word, |segment| {
        IRREGULAR
            .iter()
            .find(|(singular, _)| *singular == segment)
            .map(|(_, plural)| (*plural).to_string())
            .unwrap_or_else(|| apply_rules(&PLURAL_RULES, segment))
    })
}

fn inflect_last_segment(word: &str, inflect: impl Fn(&str) -> String) -> String {
    let (prefix, segment) = match word.rsplit_once('_') {
        Some((prefix, segment)) => (Some(prefix), segment),
        None => (None, word),
    };

    if segment.is_empty() || UNCOUNTABLE.contains(&segment) {
        return word.to_string();
    }

    let inflected = inflect(segment);

    match prefix {
        Some(prefix) => format!("{prefix}_{inflected}"),
        None => inflected,
    }
}

fn apply_rules(rules: &[(Regex, &'static str)], segment: &str) -> String {
    rules
        .iter()
        .find(|(regex, _)| regex.is_match(segment))
        .map(|(regex, replacement)| regex.replace(segment, *replacement).into_owned())
        .unwrap_or_else(|| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize_vectors() {
        let vectors = [
            ("payments", "payment"),
            ("creatives", "creative"),
            ("categories", "category"),
            ("creative_categories", "creative_category"),
            ("sub_id_statistics", "sub_id_statistic"),
            ("statuses", "status"),
            ("status", "status"),
            ("addresses", "address"),
            ("address", "address"),
            ("messages", "message"),
            ("program_list", "program_list"),
            ("transactions", "transaction"),
            ("people", "person"),
            ("information", "information"),
            ("analyses", "analysis"),
            ("shelves", "shelf"),
            ("knives", "knife"),
            ("matrices", "matrix"),
            ("data", "datum"),
            ("series", "series"),
        ];

        for (plural, singular) in vectors {
            assert_eq!(singularize(plural), singular, "singularize({plural})");
        }
    }

    #[test]
    fn test_pluralize_vectors() {
        let vectors = [
            ("payment", "payments"),
            ("creative", "creatives"),
            ("category", "categories"),
            ("sub_id_statistic", "sub_id_statistics"),
            ("status", "statuses"),
            ("address", "addresses"),
            ("program_list", "program_lists"),
            ("box", "boxes"),
            ("person", "people"),
            ("knife", "knives"),
            ("shelf", "shelves"),
            ("day", "days"),
            ("payments", "payments"),
            ("information", "information"),
        ];

        for (singular, plural) in vectors {
            assert_eq!(pluralize(singular), plural, "pluralize({singular})");
        }
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(camelize("get_payments"), "GetPayments");
        assert_eq!(camelize("get_sub_id_statistics"), "GetSubIdStatistics");
        assert_eq!(underscore("GetPaymentsResult"), "get_payments_result");
        assert_eq!(underscore("GetSubIDStatistics"), "get_sub_id_statistics");
        assert_eq!(underscore("TotalRecords"), "total_records");
    }
}
