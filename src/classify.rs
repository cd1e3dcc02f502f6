// Keyword heuristic that picks which sample visualization to show for a
// question. It never influences the answer itself.

/// Visualization category inferred from the question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    TopPortfolios,
    TopTransactions,
    RiskDistribution,
    ClientList,
    InvestmentTrends,
    TransactionAnalysis,
}

impl QueryKind {
    /// Toast shown when this visualization becomes available.
    pub fn notification(self) -> &'static str {
        match self {
            QueryKind::TopPortfolios => "Portfolio analysis visualization available!",
            QueryKind::TopTransactions => "Transaction analysis visualization available!",
            QueryKind::RiskDistribution => "Risk analysis visualization available!",
            QueryKind::ClientList => "Client information visualization available!",
            QueryKind::InvestmentTrends => "Investment trends visualization available!",
            QueryKind::TransactionAnalysis => "Transaction analysis visualization available!",
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a question. Rules are checked in order; the first match wins.
pub fn classify(question: &str) -> Option<QueryKind> {
    let q = question.to_lowercase();

    if q.contains("top") && contains_any(&q, &["investor", "client", "portfolio"]) {
        Some(QueryKind::TopPortfolios)
    } else if q.contains("top") && contains_any(&q, &["transaction", "amount", "investment"]) {
        Some(QueryKind::TopTransactions)
    } else if q.contains("risk") && contains_any(&q, &["distribution", "appetite"]) {
        Some(QueryKind::RiskDistribution)
    } else if contains_any(&q, &["name", "who", "client"]) {
        Some(QueryKind::ClientList)
    } else if contains_any(&q, &["trend", "investment", "performance"]) {
        Some(QueryKind::InvestmentTrends)
    } else if contains_any(&q, &["amount", "transaction"]) {
        Some(QueryKind::TransactionAnalysis)
    } else {
        None
    }
}

/// First run of ASCII digits in `text`.
pub fn first_number(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Confirmation shown after an answer arrives, if the question asked for
/// something specific.
pub fn follow_up_notice(question: &str) -> Option<String> {
    let q = question.to_lowercase();
    if q.contains("top") {
        if let Some(n) = first_number(&q) {
            return Some(format!("Found top {n} results as requested!"));
        }
    }
    if q.contains("name") || q.contains("who") {
        return Some("Names prioritized in results!".to_string());
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
