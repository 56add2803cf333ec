use verdant_database::model::entry::Category;

/// Build the fixed advisory prompt for one entry.
pub fn feedback_prompt(category: Category, entry_text: &str) -> String {
    format!(
        "You are a sustainability coach.\n\
         Reflect on the user's {category} entry: \"{entry_text}\"\n\n\
         Respond with:\n\
         1) A brief encouragement regarding their resource-usage habits.\n\
         2) One simple tip for improvement or consistency."
    )
}

#[cfg(test)]
mod tests {
    use verdant_database::model::entry::Category;

    use super::feedback_prompt;

    #[test]
    fn prompt_embeds_category_and_entry() {
        let prompt = feedback_prompt(Category::Solar, "Panel output at 4.2kWh");

        assert!(prompt.contains("solar"));
        assert!(prompt.contains("Panel output at 4.2kWh"));
        assert!(prompt.contains("sustainability coach"));
    }
}
