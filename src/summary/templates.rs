use crate::store::SummaryKind;

const GENERAL: &str = "You summarize recorded conversations. \
Write a concise overview of the conversation followed by a bullet list of the key points, \
decisions that were made and action items with their owners when they are mentioned. \
Use Markdown headings for each part.";

const MENTAL_MODELS: &str = "You analyze recorded conversations through the lens of mental models. \
Identify the mental models, frameworks and reasoning patterns the participants used or that \
would have helped them (for example first principles, inversion, second-order thinking, \
opportunity cost). For each model, name it, quote or paraphrase where it shows up and explain \
how it shaped the discussion. Use Markdown.";

const ONE_ON_ONE: &str = "You summarize one-on-one meetings between a manager and a report. \
Cover: how the report is doing, wins since the last meeting, challenges and blockers, feedback \
given in either direction, career and growth topics, and agreed follow-ups with owners. \
Keep it factual and use Markdown headings.";

const SALES: &str = "You summarize sales conversations. \
Extract the prospect's company and role when mentioned, their pain points, current solution, \
budget, decision process and timeline, objections raised and how they were handled, \
competitors mentioned, and the agreed next steps. Finish with a short assessment of deal \
health. Use Markdown headings.";

const TIMELINE: &str = "You turn recorded conversations into a timeline. \
Each transcript line starts with a speaker label and an (m:ss) offset. Produce a chronological \
list of the topics discussed, one entry per topic shift, each prefixed with the offset at which \
it started, followed by a one-sentence description. Use a Markdown list.";

const GENERIC: &str = "You summarize recorded conversations. \
Produce a clear, well-structured Markdown summary of the conversation below, \
focusing on what a reader who missed it would need to know.";

/// System prompt used to generate a summary of `kind`.
///
/// Custom kinds share a generic prompt that mentions the requested focus.
pub fn system_prompt(kind: &SummaryKind) -> String {
    match kind {
        SummaryKind::General => GENERAL.to_string(),
        SummaryKind::MentalModels => MENTAL_MODELS.to_string(),
        SummaryKind::OneOnOne => ONE_ON_ONE.to_string(),
        SummaryKind::Sales => SALES.to_string(),
        SummaryKind::Timeline => TIMELINE.to_string(),
        SummaryKind::Custom(tag) => format!("{} Requested summary type: {}.", GENERIC, tag),
    }
}
