//! Ranking detected languages against registry devfile types
//!
//! Languages found through a build/config file are tried before languages
//! found through file statistics. For a config-file language a framework
//! match (project type or tag) is preferred over a plain language match.
//! The first registry entry matching in that order wins.

use super::languages::{rule_for, LanguageRule};
use super::DetectedLanguage;
use crate::catalog::DevfileType;

pub fn select_devfile_type(languages: &[DetectedLanguage], types: &[DevfileType]) -> Option<usize> {
    let mut ordered: Vec<&DetectedLanguage> =
        languages.iter().filter(|l| l.can_be_component).collect();
    ordered.sort_by(|a, b| {
        b.from_config
            .cmp(&a.from_config)
            .then(b.weight.total_cmp(&a.weight))
    });

    for language in ordered {
        let rule = rule_for(&language.name);
        let is_language = |t: &DevfileType| language_matches(rule, language, t);

        if language.from_config {
            for framework in &language.frameworks {
                let found = types.iter().position(|t| {
                    is_language(t)
                        && (t.project_type.eq_ignore_ascii_case(framework)
                            || t.tags.iter().any(|tag| tag.eq_ignore_ascii_case(framework)))
                });
                if found.is_some() {
                    return found;
                }
            }
        }

        if let Some(index) = types.iter().position(is_language) {
            return Some(index);
        }
    }

    None
}

fn language_matches(
    rule: Option<&LanguageRule>,
    language: &DetectedLanguage,
    t: &DevfileType,
) -> bool {
    let named = |label: &str| match rule {
        Some(rule) => rule.is_named(label),
        None => label.eq_ignore_ascii_case(&language.name),
    };
    named(&t.language) || t.tags.iter().any(|tag| named(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(
        name: &str,
        weight: f64,
        from_config: bool,
        frameworks: &[&str],
    ) -> DetectedLanguage {
        DetectedLanguage {
            name: name.to_string(),
            weight,
            from_config,
            can_be_component: from_config || weight >= 20.0,
            frameworks: frameworks.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn registry() -> Vec<DevfileType> {
        vec![
            DevfileType::new("nodejs-basic", "JavaScript", "Node.js", &["NodeJS", "Express"]),
            DevfileType::new("python-basic", "Python", "Python", &["Python", "Pip"]),
            DevfileType::new("java-springboot-basic", "Java", "springboot", &["Java", "Spring"]),
            DevfileType::new("java-quarkus", "Java", "quarkus", &["Java", "Quarkus"]),
            DevfileType::new("go-basic", "Go", "Go", &["Go"]),
            DevfileType::new("dotnet60-basic", ".NET", "dotnet", &[".NET", "C#"]),
        ]
    }

    #[test]
    fn test_framework_match_beats_language_order() {
        let languages = vec![language("Java", 90.0, true, &["quarkus"])];
        assert_eq!(select_devfile_type(&languages, &registry()), Some(3));
    }

    #[test]
    fn test_language_match_without_framework() {
        let languages = vec![language("Java", 90.0, true, &[])];
        assert_eq!(select_devfile_type(&languages, &registry()), Some(2));
    }

    #[test]
    fn test_config_language_outranks_higher_percentage() {
        let languages = vec![
            language("Python", 70.0, false, &[]),
            language("Go", 30.0, true, &[]),
        ];
        assert_eq!(select_devfile_type(&languages, &registry()), Some(4));
    }

    #[test]
    fn test_percentage_fallback_by_weight() {
        let languages = vec![
            language("JavaScript", 25.0, false, &[]),
            language("Python", 75.0, false, &[]),
        ];
        assert_eq!(select_devfile_type(&languages, &registry()), Some(1));
    }

    #[test]
    fn test_aliases_match_registry_spelling() {
        let languages = vec![language("C#", 100.0, true, &[])];
        assert_eq!(select_devfile_type(&languages, &registry()), Some(5));
    }

    #[test]
    fn test_non_component_languages_are_skipped() {
        let languages = vec![language("Python", 10.0, false, &[])];
        assert_eq!(select_devfile_type(&languages, &registry()), None);
    }

    #[test]
    fn test_no_match() {
        let languages = vec![language("Rust", 100.0, true, &[])];
        assert_eq!(select_devfile_type(&languages, &registry()), None);
        assert_eq!(select_devfile_type(&[], &registry()), None);
    }
}
