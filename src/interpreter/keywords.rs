use serde::{Deserialize, Serialize};

use crate::domain::diary::Mood;

/// Maps trigger words to the category name to look up in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryHint {
    pub keywords: Vec<String>,
    pub category: String,
}

/// Maps trigger words to a mood. Hints are checked in order; the first match
/// wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodHint {
    pub keywords: Vec<String>,
    pub mood: Mood,
}

/// Keyword tables driving classification and extraction. Serializable so a
/// customized table can be loaded in place of the built-in one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSets {
    pub task: Vec<String>,
    pub expense: Vec<String>,
    pub income: Vec<String>,
    pub diary: Vec<String>,
    pub budget: Vec<String>,
    pub expense_hints: Vec<CategoryHint>,
    pub expense_fallback: String,
    pub income_hints: Vec<CategoryHint>,
    pub income_fallback: String,
    pub budget_hints: Vec<CategoryHint>,
    pub budget_fallback: String,
    pub priority_high: Vec<String>,
    pub priority_low: Vec<String>,
    pub mood_hints: Vec<MoodHint>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            task: words(&["task", "todo", "to do"]),
            expense: words(&["spent", "paid", "expense"]),
            income: words(&["received", "earned", "income", "salary"]),
            diary: words(&["feel", "diary", "journal", "today was"]),
            budget: words(&["budget", "set budget"]),
            expense_hints: vec![
                hint(&["food", "lunch", "dinner"], "Food"),
                hint(&["transport", "uber", "taxi"], "Transportation"),
                hint(&["shopping", "clothes"], "Shopping"),
                hint(&["entertainment", "movie"], "Entertainment"),
            ],
            expense_fallback: "Other".to_string(),
            income_hints: vec![
                hint(&["freelance", "project"], "Freelance"),
                hint(&["investment", "dividend"], "Investments"),
            ],
            income_fallback: "Salary".to_string(),
            budget_hints: vec![
                hint(&["food", "groceries"], "Food"),
                hint(&["transport"], "Transportation"),
                hint(&["entertainment"], "Entertainment"),
            ],
            budget_fallback: "Other".to_string(),
            priority_high: words(&["high priority", "urgent"]),
            priority_low: words(&["low priority"]),
            mood_hints: vec![
                mood(&["great", "amazing", "wonderful", "excellent"], Mood::Great),
                mood(&["good", "happy", "nice"], Mood::Good),
                mood(&["bad", "sad", "difficult"], Mood::Bad),
                mood(&["terrible", "awful", "horrible"], Mood::Terrible),
            ],
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| word.to_string()).collect()
}

fn hint(keywords: &[&str], category: &str) -> CategoryHint {
    CategoryHint {
        keywords: words(keywords),
        category: category.to_string(),
    }
}

fn mood(keywords: &[&str], mood: Mood) -> MoodHint {
    MoodHint {
        keywords: words(keywords),
        mood,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let sets = KeywordSets::default();
        let json = serde_json::to_string(&sets).unwrap();
        let back: KeywordSets = serde_json::from_str(&json).unwrap();
        assert_eq!(back.task, sets.task);
        assert_eq!(back.expense_fallback, "Other");
        assert_eq!(back.mood_hints.len(), 4);
    }

    #[test]
    fn partial_tables_fill_from_defaults() {
        let custom: KeywordSets = serde_json::from_str(r#"{"task": ["chore"]}"#).unwrap();
        assert_eq!(custom.task, vec!["chore".to_string()]);
        assert_eq!(custom.expense, KeywordSets::default().expense);
    }
}
