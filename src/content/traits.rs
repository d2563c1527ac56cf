use crate::persona::Persona;
use crate::social::Post;
use async_trait::async_trait;

/// Text-generation collaborator, treated as a pure (possibly failing)
/// function of post and persona.
///
/// Failures propagate as `Err`; the orchestrator owns the fallback content,
/// never this trait's implementations.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// One reply in the persona's voice, suitable for posting as-is.
    async fn generate_reply(&self, post: &Post, persona: &Persona) -> anyhow::Result<String>;

    /// Up to `len` thread segments expanding on the post. Implementations
    /// may return fewer, never more.
    async fn generate_thread(
        &self,
        post: &Post,
        persona: &Persona,
        len: usize,
    ) -> anyhow::Result<Vec<String>>;
}
