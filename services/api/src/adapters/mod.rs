pub mod chat_llm;
pub mod follow_up;
pub mod sentiment;
pub mod web_search;

pub use chat_llm::ChatLlmAdapter;
pub use follow_up::RetrievalFollowUpAdapter;
pub use sentiment::VaderSentimentAdapter;
pub use web_search::TavilySearchAdapter;
