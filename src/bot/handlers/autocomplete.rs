//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the read cache, so typing does not hit the database on
//! every keystroke. Discord accepts at most 25 suggestions.

use crate::{
    bot::BotData,
    core::{insurance::PRIVATE_INSURANCE_LABEL, schedule::TIME_SLOTS},
    errors::Error,
};

const MAX_SUGGESTIONS: usize = 25;

fn matching<I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests active professional names.
pub async fn autocomplete_professional(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let Ok(professionals) = data.cache.professionals(&data.database).await else {
        return Vec::new();
    };
    matching(professionals.into_iter().map(|p| p.name), partial)
}

/// Suggests patient names containing what was typed so far.
pub async fn autocomplete_patient(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let Ok(patients) = data.cache.patients(&data.database, partial).await else {
        return Vec::new();
    };

    let mut names: Vec<String> = patients.into_iter().map(|p| p.name).collect();
    names.dedup();
    names.truncate(MAX_SUGGESTIONS);
    names
}

/// Suggests active insurances, with `Particular` (private) first.
pub async fn autocomplete_insurance(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let insurances = data
        .cache
        .insurances(&data.database)
        .await
        .unwrap_or_default();

    matching(
        std::iter::once(PRIVATE_INSURANCE_LABEL.to_string())
            .chain(insurances.into_iter().map(|i| i.name)),
        partial,
    )
}

/// Suggests bookable time slots.
pub async fn autocomplete_time_slot(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    TIME_SLOTS
        .iter()
        .filter(|slot| slot.starts_with(partial.trim()))
        .map(|&slot| slot.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive_and_capped() {
        let names = vec!["Ana Paula".to_string(), "Carlos".to_string(), "Juliana".to_string()];
        assert_eq!(matching(names, "ANA"), vec!["Ana Paula", "Juliana"]);

        let many = (0..40).map(|i| format!("Patient {i}"));
        assert_eq!(matching(many, "patient").len(), MAX_SUGGESTIONS);
    }
}
