use crate::alert::Alert;

pub const OVERRIDE_RECEIVERS: &str = "override_receivers";
pub const ADDITIONAL_RECEIVERS: &str = "additional_receivers";

/// Computes the chat ids one alert is delivered to.
///
/// A non-empty `overrides` replaces `defaults`; a non-empty `additional` is
/// appended afterwards. Both are split on `,` without trimming, and neither
/// duplicates nor empty ids are removed.
pub fn resolve_receivers(defaults: &[String], overrides: &str, additional: &str) -> Vec<String> {
    let mut ids = if overrides.is_empty() {
        defaults.to_vec()
    } else {
        overrides.split(',').map(String::from).collect()
    };

    if !additional.is_empty() {
        ids.extend(additional.split(',').map(String::from));
    }

    ids
}

/// Resolves receivers from the alert's own annotations.
pub fn receivers_for(alert: &Alert, defaults: &[String]) -> Vec<String> {
    resolve_receivers(
        defaults,
        alert.annotation(OVERRIDE_RECEIVERS),
        alert.annotation(ADDITIONAL_RECEIVERS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_defaults_only() {
        assert_eq!(resolve_receivers(&ids(&["A", "B"]), "", ""), ids(&["A", "B"]));
    }

    #[test]
    fn test_override_discards_defaults() {
        assert_eq!(resolve_receivers(&ids(&["A", "B"]), "C,D", ""), ids(&["C", "D"]));
    }

    #[test]
    fn test_additional_survives_override() {
        assert_eq!(resolve_receivers(&ids(&["A", "B"]), "C", "E,F"), ids(&["C", "E", "F"]));
    }

    #[test]
    fn test_additional_appends_to_defaults() {
        assert_eq!(resolve_receivers(&ids(&["A"]), "", "B"), ids(&["A", "B"]));
    }

    #[test]
    fn test_values_are_not_trimmed_or_deduplicated() {
        assert_eq!(
            resolve_receivers(&ids(&["A"]), "C, D,", "C"),
            ids(&["C", " D", "", "C"])
        );
    }

    #[test]
    fn test_defaults_are_not_mutated() {
        let defaults = ids(&["A"]);
        let _ = resolve_receivers(&defaults, "", "B,C");
        assert_eq!(defaults, ids(&["A"]));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let defaults = ids(&["A", "B"]);
        let first = resolve_receivers(&defaults, "", "C,D");
        let second = resolve_receivers(&defaults, "", "C,D");
        assert_eq!(first, second);
    }

    #[test]
    fn test_receivers_for_reads_annotations() {
        let mut alert = Alert::default();
        alert.annotations.insert(OVERRIDE_RECEIVERS.to_string(), "X".to_string());
        alert.annotations.insert(ADDITIONAL_RECEIVERS.to_string(), "Y".to_string());
        assert_eq!(receivers_for(&alert, &ids(&["A"])), ids(&["X", "Y"]));
    }
}
