//! Static legal-citation table.
//!
//! Legal/product content, not logic: citations from the Industrial Safety
//! and Health Act (労働安全衛生法), keyed by the hazard descriptor exactly
//! as entered. Unknown hazards fall back to the general duty clause.

/// One citation: article number plus its operative text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LawArticle {
    pub article: &'static str,
    pub content: &'static str,
}

const LAW_ARTICLES: &[(&str, LawArticle)] = &[
    (
        "コンベヤー",
        LawArticle {
            article: "労働安全衛生法第20条",
            content: "事業者は労働者の安全を確保しなければならない。",
        },
    ),
    (
        "足場",
        LawArticle {
            article: "労働安全衛生法第21条",
            content: "事業者は足場の安全性を確保しなければならない。",
        },
    ),
];

/// Citation used when no hazard-specific article is on file.
pub const GENERAL_DUTY: LawArticle = LawArticle {
    article: "労働安全衛生法（概略）",
    content: "労働者の安全を確保するため、事業者は必要な措置を講じる義務があります。",
};

/// Exact-key lookup on the hazard descriptor.
pub fn article_for_hazard(hazard: &str) -> &'static LawArticle {
    LAW_ARTICLES
        .iter()
        .find(|(key, _)| *key == hazard)
        .map(|(_, article)| article)
        .unwrap_or(&GENERAL_DUTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hazard_returns_specific_article() {
        let law = article_for_hazard("足場");
        assert_eq!(law.article, "労働安全衛生法第21条");
    }

    #[test]
    fn test_unknown_hazard_falls_back_to_general_duty() {
        assert_eq!(*article_for_hazard("プレス機"), GENERAL_DUTY);
        assert_eq!(*article_for_hazard(""), GENERAL_DUTY);
    }

    #[test]
    fn test_lookup_is_exact_not_substring() {
        // "コンベヤーのベルト" is not a table key; only the exact descriptor hits.
        assert_eq!(*article_for_hazard("コンベヤーのベルト"), GENERAL_DUTY);
    }
}
