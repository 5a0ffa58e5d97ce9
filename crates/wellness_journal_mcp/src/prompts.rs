use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};

pub fn daily_check_in_prompt(date: &str) -> GetPromptResult {
    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Help me log my wellness journal entry for {date}.\n\nAsk me, one short question at a time, about:\n1. Mood (a word for it and a 1-10 score)\n2. Sleep (hours and quality 1-10)\n3. Exercise (type, minutes, intensity light/moderate/high)\n4. Water intake (glasses)\n5. Any symptoms and their severity (0-10)\n6. Stress and anxiety (1-10), something I'm grateful for and today's challenges\n\nWhen done, call store_entry with the collected entry (date {date}), then call analyze_stored_entry with the returned id and summarize my score, any risks and the top recommendations in a warm, concise tone."
            ),
        )])
    .with_description(format!("Guided wellness check-in for {date}"))
}

pub fn weekly_review_prompt(days_back: u32) -> GetPromptResult {
    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Review my wellness journal over the past {days_back} days.\n\nCover:\n1. Averages for mood, sleep and stress, and the most common exercise\n2. Trend direction for mood, sleep, stress and exercise (remember falling stress is good)\n3. Any history-wide risk patterns\n4. Two or three concrete focus areas for next week\n\nUse get_history_summary and get_trends with limit={days_back}, and detect_risks with include_patterns=true on my most recent entry (list_entries then get_entry). Keep it encouraging and specific."
            ),
        )])
    .with_description(format!("Wellness review of the past {days_back} days"))
}

pub fn risk_follow_up_prompt(risk: Option<&str>) -> GetPromptResult {
    let focus = match risk {
        Some(kind) => format!("the `{kind}` risk"),
        None => "the most severe risk".to_string(),
    };
    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "My latest wellness analysis flagged some risks. Focus on {focus}.\n\nUse list_entries to find my latest entry and analyze_stored_entry to see the findings. Then:\n1. Explain in plain words what the finding means\n2. Check get_trends for whether it is getting better or worse\n3. Suggest a small, realistic plan for the next three days\n4. Say clearly when it would be wise to talk to a healthcare professional\n\nDo not diagnose; this is a self-care journal."
            ),
        )])
    .with_description(format!("Follow-up plan for {focus}"))
}
