//! Static per-model pricing and cost calculation.

use super::ModelId;

/// Price of one model, in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingEntry {
    pub model_id: ModelId,
    pub display_name: &'static str,
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
}

/// Pricing for every known model, in [`ModelId::ALL`] order.
pub const PRICING: [PricingEntry; 4] = [
    PricingEntry {
        model_id: ModelId::Gpt5,
        display_name: "GPT-5",
        input_price_per_million: 2.50,
        output_price_per_million: 10.00,
    },
    PricingEntry {
        model_id: ModelId::ClaudeSonnet45,
        display_name: "Claude Sonnet 4.5",
        input_price_per_million: 3.00,
        output_price_per_million: 15.00,
    },
    PricingEntry {
        model_id: ModelId::DeepSeekChat,
        display_name: "DeepSeek v3.2-Exp",
        input_price_per_million: 0.28,
        output_price_per_million: 0.42,
    },
    PricingEntry {
        model_id: ModelId::DeepSeekChatV31,
        display_name: "DeepSeek v3.1-Terminus",
        input_price_per_million: 0.55,
        output_price_per_million: 2.19,
    },
];

/// Look up the pricing entry for a model.
pub fn pricing(model: ModelId) -> &'static PricingEntry {
    match model {
        ModelId::Gpt5 => &PRICING[0],
        ModelId::ClaudeSonnet45 => &PRICING[1],
        ModelId::DeepSeekChat => &PRICING[2],
        ModelId::DeepSeekChatV31 => &PRICING[3],
    }
}

/// Dollar cost of one call. Not rounded; formatting is left to the caller.
pub fn calculate_cost(model: ModelId, input_tokens: u64, output_tokens: u64) -> f64 {
    let entry = pricing(model);
    let input_cost = (input_tokens as f64 / 1_000_000.0) * entry.input_price_per_million;
    let output_cost = (output_tokens as f64 / 1_000_000.0) * entry.output_price_per_million;
    input_cost + output_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_model_order() {
        for (entry, model) in PRICING.iter().zip(ModelId::ALL) {
            assert_eq!(entry.model_id, model);
            assert_eq!(pricing(model).model_id, model);
        }
    }

    #[test]
    fn test_one_million_each_is_sum_of_prices() {
        for model in ModelId::ALL {
            let entry = pricing(model);
            let cost = calculate_cost(model, 1_000_000, 1_000_000);
            let expected = entry.input_price_per_million + entry.output_price_per_million;
            assert!((cost - expected).abs() < 1e-9, "{model}: {cost} != {expected}");
        }
    }

    #[test]
    fn test_zero_tokens_is_free() {
        for model in ModelId::ALL {
            assert_eq!(calculate_cost(model, 0, 0), 0.0);
        }
    }

    #[test]
    fn test_cost_is_not_rounded() {
        // 100 input + 50 output on deepseek-chat: 0.000028 + 0.000021
        let cost = calculate_cost(ModelId::DeepSeekChat, 100, 50);
        assert!((cost - 0.000049).abs() < 1e-12);
    }

    #[test]
    fn test_output_weighted_more_for_claude() {
        let input_heavy = calculate_cost(ModelId::ClaudeSonnet45, 10_000, 0);
        let output_heavy = calculate_cost(ModelId::ClaudeSonnet45, 0, 10_000);
        assert!((input_heavy - 0.03).abs() < 1e-12);
        assert!((output_heavy - 0.15).abs() < 1e-12);
    }
}
