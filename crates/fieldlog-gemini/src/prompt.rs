// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed extraction prompt.
//!
//! One template, no variation: the model's only job is to fill the
//! five-key schema from a field-staff message. Few-shot examples pin the
//! two behaviors that matter most in practice, order-quantity summation
//! and strict JSON output.

/// Instruction template. `{text}` is replaced with the user message.
const EXTRACTION_TEMPLATE: &str = r#"You are an intelligent assistant for a pharmaceutical company's internal sales and purchase tracking bot.

Your task is to extract structured information from unstructured or casually written human messages.

CONTEXT:
Field staff send updates via Telegram. These can be messy, semi-structured, or casual language.

Extract values for the following schema:
{
  "client": "Name of the pharmacy or vendor, e.g. Apollo Pharmacy",
  "location": "Area of sale/purchase, e.g. Chembur",
  "orders": Number of total items/units (e.g. 8 if '3 boxes + 5 bottles'),
  "amount": Numeric value of amount in INR (e.g. 24000 for Rs 24,000), strip currency and commas,
  "remarks": Exact text from user (no paraphrasing)
}

IMPORTANT RULES:
1. Respond ONLY with the JSON. No text before/after.
2. If a field is missing, assign null.
3. Do NOT assume. Only extract what's mentioned.
4. Format numbers properly (e.g., 24,000 becomes 24000).
5. For ORDERS: If multiple items mentioned (e.g., "3 boxes + 5 bottles"), sum them up to a single number (8).
6. For ORDERS: If quantities are unclear ("some tablets"), use null.
7. No code blocks, markdown, or explanation. Just clean JSON.

EXAMPLES:
Input: "Sold 3 boxes of paracetamol and 5 bottles of syrup to Apollo for 25000"
Output: {"client": "Apollo", "location": null, "orders": 8, "amount": 25000, "remarks": "Sold 3 boxes of paracetamol and 5 bottles of syrup to Apollo for 25000"}

Input: "Client: XYZ Hospital, Location: Mumbai, Orders: 10 tablets + 5 injections, Amount: 15000, Remarks: urgent delivery"
Output: {"client": "XYZ Hospital", "location": "Mumbai", "orders": 15, "amount": 15000, "remarks": "urgent delivery"}

Message:
{text}

Output:
"#;

/// Build the extraction prompt for one message.
pub fn build_extraction_prompt(text: &str) -> String {
    EXTRACTION_TEMPLATE.replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_message() {
        let prompt = build_extraction_prompt("Sold 5 tablets to Apollo");
        assert!(prompt.contains("Sold 5 tablets to Apollo"));
        assert!(prompt.ends_with("Output:\n"));
    }

    #[test]
    fn prompt_names_all_schema_keys() {
        let prompt = build_extraction_prompt("x");
        for key in ["client", "location", "orders", "amount", "remarks"] {
            assert!(prompt.contains(key), "prompt must mention `{key}`");
        }
    }

    #[test]
    fn prompt_keeps_the_summation_example() {
        let prompt = build_extraction_prompt("x");
        assert!(prompt.contains(r#""orders": 8"#));
    }
}
