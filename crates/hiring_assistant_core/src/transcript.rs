//! crates/hiring_assistant_core/src/transcript.rs
//!
//! The append-only conversation log and the context turns it is seeded with.

use crate::domain::{ConversationTurn, Position};

pub const COMPANY_NAME: &str = "PG-AGI";

const AI_ML_JOB_DESCRIPTION: &str = r#"We're at the forefront of creating advanced AI systems, from fully autonomous agents that provide intelligent customer interaction to data analysis tools that offer insightful business solutions. We are seeking enthusiastic interns who are passionate about AI and ready to tackle real-world problems using the latest technologies.

Duration: 6 months

Perks:

- Hands-on experience with real AI projects.
- Mentoring from industry experts.
- A collaborative, innovative and flexible work environment

After completion of the internship period, there is a chance to get a full-time opportunity as AI/ML engineer (Up to 12 LPA).

Key Responsibilities
Experience working with python, LLM, Deep Learning, NLP, etc..
Utilize GitHub for version control, including pushing and pulling code updates.
Work with Hugging Face and OpenAI platforms for deploying models and exploring open-source AI models.
Engage in prompt engineering and the fine-tuning process of AI models.
Requirements
Proficiency in Python programming.
Experience with GitHub and version control workflows.
Familiarity with AI platforms such as Hugging Face and OpenAI.
Understanding of prompt engineering and model fine-tuning.
Excellent problem-solving abilities and a keen interest in AI technology."#;

const SDE_JOB_DESCRIPTION: &str = r#"We're at the forefront of creating advanced AI systems, from fully autonomous agents that provide intelligent customer interaction to data analysis tools that offer insightful business solutions. We are seeking enthusiastic interns who are passionate about AI and ready to tackle real-world problems using the latest technologies.

Duration: 6 months

Perks:

- Hands-on experience with real AI projects.
- Mentoring from industry experts.
- A collaborative, innovative and flexible work environment

After completion of the internship period, there is a chance to get a full-time opportunity a Software Development engineer (Up to 12 LPA).

Key Responsibilities
Engage in the full software development lifecycle: ideation, design, development, testing, and deployment.
Develop responsive, high-performance web applications utilizing HTML, CSS, JavaScript, and frameworks such as React, Angular, and Next.js.
Create back-end services and APIs using Node.js, managing data with MongoDB and Supabase.
Utilize cloud services like AWS for hosting and scaling applications.
Collaborate on the design of efficient and scalable database schemas.
Learn from code reviews with seasoned developers, adopting best practices and coding standards.
Requirements
Enrollment in a Computer Science or related degree program.
Proficiency in HTML, CSS, JavaScript, with experience in frameworks like React, Angular, or Next.js.
Understanding of back-end development using Node.js.
Knowledge of database technologies such as MongoDB and Supabase.
Exposure to cloud services, particularly AWS, and familiarity with hosting principles.
Strong problem-solving capabilities and a continuous learning mindset.
Excellent teamwork and communication skills.
Mandatory proficiency in GIT."#;

/// The job description the seed turns carry for a position.
pub fn job_description(position: Position) -> &'static str {
    match position {
        Position::AiMlIntern => AI_ML_JOB_DESCRIPTION,
        Position::SdeIntern => SDE_JOB_DESCRIPTION,
    }
}

/// The fixed background turns every session starts with, in order.
pub fn default_seed() -> Vec<ConversationTurn> {
    vec![
        ConversationTurn::new("company name", COMPANY_NAME),
        ConversationTurn::new("role", Position::AiMlIntern.title()),
        ConversationTurn::new("job discription", AI_ML_JOB_DESCRIPTION),
        ConversationTurn::new("role", Position::SdeIntern.title()),
        ConversationTurn::new("job discription", SDE_JOB_DESCRIPTION),
    ]
}

/// An ordered, append-only record of every exchange in a session.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log primed with the default company and role context.
    pub fn seeded() -> Self {
        Self::with_seed(default_seed())
    }

    pub fn with_seed(seed: Vec<ConversationTurn>) -> Self {
        Self { turns: seed }
    }

    pub fn append(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.turns.push(ConversationTurn::new(prompt, response));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The transcript as plain `(prompt, response)` pairs.
    pub fn as_transcript(&self) -> Vec<(&str, &str)> {
        self.turns
            .iter()
            .map(|t| (t.prompt.as_str(), t.response.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }
}
