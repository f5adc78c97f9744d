//! Prompt construction for a single file review.
//!
//! Pure function of the [`ReviewRequest`]: an instructional template keyed
//! by review type, a language directive, the (already truncated) file
//! content and diff in fenced blocks, and an explicit output contract the
//! response parser depends on.

use crate::models::{Language, ReviewRequest, ReviewType};

/// System-level instruction sent alongside every prompt.
///
/// Kept separate from the user prompt because some providers weight the
/// system message more heavily for format compliance.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert code reviewer. \
    Respond with a single JSON object and nothing else: no prose before or \
    after it, no markdown fences.";

/// Build the user prompt for one review request.
pub fn build(request: &ReviewRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str(review_instructions(request.review_type));
    prompt.push_str("\n\n");
    prompt.push_str(language_directive(request.language));
    prompt.push_str("\n\n");

    prompt.push_str(&format!(
        "## File: {}\n\n```\n{}\n```\n\n",
        request.filename, request.content
    ));
    prompt.push_str(&format!("## Diff\n\n```diff\n{}\n```\n\n", request.diff));

    prompt.push_str(&output_contract(request.max_issues_per_file));

    prompt
}

/// The instructional template for a review type.
fn review_instructions(review_type: ReviewType) -> &'static str {
    match review_type {
        ReviewType::Full => {
            "Review the following code change thoroughly. Consider correctness, \
             security, performance, style, and maintainability. Focus on the \
             changed lines shown in the diff, using the full file for context."
        }
        ReviewType::Security => {
            "Review the following code change for security problems only: \
             injection vulnerabilities, authentication and authorization flaws, \
             unsafe handling of untrusted input, secrets in code, and unsafe \
             dependencies. Ignore style and performance concerns."
        }
        ReviewType::Performance => {
            "Review the following code change for performance problems only: \
             unnecessary allocations, quadratic or worse algorithms, blocking \
             calls on hot paths, missing caching opportunities, and wasteful \
             I/O. Ignore style and security concerns."
        }
        ReviewType::Style => {
            "Review the following code change for style and readability only: \
             naming, structure, dead code, documentation, and idiomatic usage. \
             Ignore security and performance concerns."
        }
    }
}

/// The directive selecting the model's answer language.
fn language_directive(language: Language) -> &'static str {
    match language {
        Language::Ko => "모든 리뷰 내용(요약, 이슈 설명, 제안)을 한국어로 작성하세요.",
        Language::En => "Write all review text (summary, issue descriptions, suggestions) in English.",
        Language::Ja => "すべてのレビュー内容(要約、指摘事項、提案)を日本語で書いてください。",
        Language::Zh => "请用中文撰写所有评审内容(摘要、问题描述、建议)。",
    }
}

/// The output contract: required fields, legal enum values, and the hard
/// issue cap. The extractor and repairer both assume this shape.
fn output_contract(max_issues: u8) -> String {
    format!(
        "## Output format\n\n\
         Respond with a JSON object with exactly these fields:\n\
         - \"summary\": one-paragraph assessment of the change\n\
         - \"issues\": array of issue objects, ranked by importance, \
         containing AT MOST {max_issues} issues\n\
         - \"positive_feedback\": array of strings noting what is done well\n\
         - \"overall_score\": integer from 1 to 10\n\n\
         Each issue object has:\n\
         - \"line\": line number in the new file, or null\n\
         - \"severity\": one of \"low\", \"medium\", \"high\", \"critical\"\n\
         - \"type\": one of \"bug\", \"security\", \"performance\", \"style\", \
         \"maintainability\"\n\
         - \"title\": short summary\n\
         - \"description\": detailed explanation\n\
         - \"suggestion\": how to fix it\n\
         - \"code_example\": corrected code snippet, or null\n\n\
         Report no more than {max_issues} issues. If the change is clean, \
         return an empty \"issues\" array."
    )
}
