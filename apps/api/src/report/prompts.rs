//! Report prompt templates.
//!
//! Template text is product content, kept out of the handler logic. Each
//! named template declares its placeholder slots and is rendered by plain
//! substitution before the completion call.

use crate::catalog::matching::ScoredMatch;
use crate::report::law::LawArticle;

/// The report template. Placeholders: `{section_length}`, `{hazard}`,
/// `{risk}`, `{related_cases}`, `{law_article}`, `{law_content}`.
pub const REPORT_PROMPT_TEMPLATE: &str = r#"あなたは日本の労働安全衛生の専門家です。
以下の【基本情報】および【関連災害事例】を踏まえ、{section_length}で生成してください。
最初に必ず【法的要求事項】として、該当する労働安全衛生法令の条文番号と内容を明記し、その後に以下3点を順に記述してください。

【基本情報】
洗い出し内容：「{hazard}」
危険状況：「{risk}」

【関連災害事例】
{related_cases}

【法的要求事項】
{law_article}: {law_content}

出力フォーマット：
① 洗い出し内容：
② 危険状況：
③ 改善提案：（優先順位：法令順守、本質安全、工学的、管理的、保護具の順。「〜をお勧めします」「〜が望まれます」で締めてください）

全て比較的フォーマルな口語体（「〜です」「〜ます」調）で出力してください。"#;

/// Section-length hints for the two named template variants.
pub const SECTION_LENGTH_STANDARD: &str = "【150文字程度ずつ】";
pub const SECTION_LENGTH_DETAILED: &str = "【300文字程度ずつ】";

/// Line substituted when no catalog record matched the query.
pub const NO_RELATED_CASES: &str = "関連事例情報なし";

/// Renders the report prompt from its parts. `detailed` selects the
/// longer-section variant of the template.
pub fn render_report_prompt(
    hazard: &str,
    risk: &str,
    related_cases: &str,
    law: &LawArticle,
    detailed: bool,
) -> String {
    let section_length = if detailed {
        SECTION_LENGTH_DETAILED
    } else {
        SECTION_LENGTH_STANDARD
    };
    let related_cases = if related_cases.is_empty() {
        NO_RELATED_CASES
    } else {
        related_cases
    };

    render_template(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("section_length", section_length),
            ("hazard", hazard),
            ("risk", risk),
            ("related_cases", related_cases),
            ("law_article", law.article),
            ("law_content", law.content),
        ],
    )
}

/// Substitutes `{slot}` placeholders in a single pass over the template.
/// Substituted values are never rescanned, so user input that happens to
/// contain a placeholder literal stays verbatim. Unknown `{...}` runs are
/// kept as-is.
fn render_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find('}') {
            Some(end) => {
                let key = &tail[1..end];
                match slots.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Formats matched cases as the prompt's related-case block, one line per
/// case: `【事例N】<situation> / 原因: <cause> / 対策: <mitigation>`.
///
/// Only cases with actual keyword overlap are included; the matcher's
/// zero-score padding records carry no information worth citing.
pub fn format_related_cases(matches: &[ScoredMatch<'_>]) -> String {
    matches
        .iter()
        .filter(|m| m.score > 0)
        .enumerate()
        .map(|(i, m)| {
            format!(
                "【事例{}】{} / 原因: {} / 対策: {}",
                i + 1,
                m.record.situation,
                m.record.cause,
                m.record.mitigation
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
