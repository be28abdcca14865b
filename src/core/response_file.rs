//! # Response-File Policy
//!
//! A [`CommandLineSession`] owns everything one invocation needs: the resolved switch
//! set, the rendered command line (computed at most once) and the state deciding
//! whether that line goes straight to the tool or into a response file.
//!
//! ```text
//! NotRendered ──direct_command (short)──> RenderedDirect
//!      │                                       │
//!      │                        response_file_commands (None, once)
//!      │                                       v
//!      └──any other query────────────────> RenderedForFile
//! ```

use crate::{
    constants::{DEFAULT_RESPONSE_FILE_THRESHOLD, MAX_COMMAND_LINE_LENGTH},
    core::{
        diagnostics::DiagnosticSink,
        generator::{CommandLineGenerator, GenerationError},
        override_resolver::resolve_overrides,
        switch_set::ActiveSwitchSet,
    },
};

/// Where the rendered command line currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing rendered yet.
    NotRendered,
    /// Rendered and handed out as a direct command; the next response-file query yields nothing.
    RenderedDirect,
    /// Rendered; response-file queries return the full text.
    RenderedForFile,
}

/// One invocation's command line.
#[derive(Debug)]
pub struct CommandLineSession<'g> {
    generator: &'g CommandLineGenerator,
    switches: ActiveSwitchSet,
    threshold: usize,
    rendered: Option<String>,
    state: RenderState,
}

impl<'g> CommandLineSession<'g> {
    /// Starts an invocation. Overridden switches are removed from `switches` right away.
    pub fn new(generator: &'g CommandLineGenerator, mut switches: ActiveSwitchSet) -> Self {
        let removed = resolve_overrides(&mut switches);
        log::debug!(
            "Session started with {} active switches ({} overridden).",
            switches.len(),
            removed
        );
        Self {
            generator,
            switches,
            threshold: DEFAULT_RESPONSE_FILE_THRESHOLD,
            rendered: None,
            state: RenderState::NotRendered,
        }
    }

    /// Command lines shorter than `threshold` characters are passed directly.
    ///
    /// The threshold is clamped to stay below `MAX_COMMAND_LINE_LENGTH`.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        let ceiling = MAX_COMMAND_LINE_LENGTH - 1;
        if threshold > ceiling {
            log::warn!(
                "Response file threshold {} is not below {}; using {}.",
                threshold,
                MAX_COMMAND_LINE_LENGTH,
                ceiling
            );
        }
        self.threshold = threshold.min(ceiling);
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn switches(&self) -> &ActiveSwitchSet {
        &self.switches
    }

    /// Whether the named switch survived resolution and is part of this invocation.
    pub fn is_property_set(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    fn render(&mut self, sink: &mut dyn DiagnosticSink) -> Result<&str, GenerationError> {
        if self.rendered.is_none() {
            let command_line = self.generator.generate(&self.switches, sink)?;
            self.rendered = Some(command_line);
        }
        if self.state == RenderState::NotRendered {
            self.state = RenderState::RenderedForFile;
        }
        Ok(self.rendered.as_deref().unwrap_or_default())
    }

    /// The full command line for this invocation, rendered at most once.
    pub fn generate_command_line(
        &mut self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<String, GenerationError> {
        self.render(sink).map(str::to_string)
    }

    /// Returns the full command line when it is short enough to pass directly,
    /// `None` when it has to go through a response file.
    pub fn direct_command(
        &mut self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Option<String>, GenerationError> {
        let threshold = self.threshold;
        let command_line = self.render(sink)?.to_string();
        let length = command_line.chars().count();

        if length < threshold {
            log::debug!("Command line is {} chars; passing it directly.", length);
            self.state = RenderState::RenderedDirect;
            Ok(Some(command_line))
        } else {
            log::debug!(
                "Command line is {} chars (limit {}); using a response file.",
                length,
                threshold
            );
            self.state = RenderState::RenderedForFile;
            Ok(None)
        }
    }

    /// Returns the text for a response file, or `None` exactly once after the
    /// command line was handed out directly.
    pub fn response_file_commands(
        &mut self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Option<String>, GenerationError> {
        let command_line = self.render(sink)?.to_string();
        if self.state == RenderState::RenderedDirect {
            self.state = RenderState::RenderedForFile;
            return Ok(None);
        }
        Ok(Some(command_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingSink;
    use crate::models::Switch;

    fn switches(values: Vec<Switch>) -> ActiveSwitchSet {
        ActiveSwitchSet::try_from(values).unwrap()
    }

    #[test]
    fn test_short_command_goes_direct_and_skips_response_file_once() {
        let generator = CommandLineGenerator::new(["Optimization", "WarningLevel"]);
        let mut session = CommandLineSession::new(
            &generator,
            switches(vec![
                Switch::enumeration("Optimization", "/O2"),
                Switch::enumeration("WarningLevel", "/W4"),
            ]),
        );
        let mut sink = CollectingSink::new();
        assert_eq!(session.state(), RenderState::NotRendered);

        assert_eq!(session.direct_command(&mut sink).unwrap().as_deref(), Some("/O2 /W4"));
        assert_eq!(session.state(), RenderState::RenderedDirect);

        assert_eq!(session.response_file_commands(&mut sink).unwrap(), None);
        assert_eq!(session.state(), RenderState::RenderedForFile);

        assert_eq!(
            session.response_file_commands(&mut sink).unwrap().as_deref(),
            Some("/O2 /W4")
        );
    }

    #[test]
    fn test_long_command_uses_response_file() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let long_value = "x".repeat(DEFAULT_RESPONSE_FILE_THRESHOLD);
        let mut session = CommandLineSession::new(
            &generator,
            switches(vec![Switch::string("Input", "", long_value.clone())]),
        );
        let mut sink = CollectingSink::new();

        assert_eq!(session.direct_command(&mut sink).unwrap(), None);
        assert_eq!(session.state(), RenderState::RenderedForFile);
        assert_eq!(session.response_file_commands(&mut sink).unwrap(), Some(long_value));
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let mut session = CommandLineSession::new(
            &generator,
            switches(vec![Switch::string("Input", "", "abcd")]),
        )
        .with_threshold(4);
        let mut sink = CollectingSink::new();
        assert_eq!(session.direct_command(&mut sink).unwrap(), None);

        let mut session = CommandLineSession::new(
            &generator,
            switches(vec![Switch::string("Input", "", "abc")]),
        )
        .with_threshold(4);
        assert_eq!(session.direct_command(&mut sink).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_threshold_is_clamped_below_ceiling() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let session = CommandLineSession::new(&generator, ActiveSwitchSet::new())
            .with_threshold(40000);
        assert_eq!(session.threshold(), MAX_COMMAND_LINE_LENGTH - 1);

        let session = CommandLineSession::new(&generator, ActiveSwitchSet::new())
            .with_threshold(MAX_COMMAND_LINE_LENGTH - 1);
        assert_eq!(session.threshold(), MAX_COMMAND_LINE_LENGTH - 1);
    }

    #[test]
    fn test_response_file_query_without_direct_decision_returns_text() {
        let generator =
            CommandLineGenerator::new(Vec::<String>::new()).with_additional_options("/x");
        let mut session = CommandLineSession::new(&generator, ActiveSwitchSet::new());
        let mut sink = CollectingSink::new();
        assert_eq!(session.generate_command_line(&mut sink).unwrap(), "/x");
        assert_eq!(
            session.response_file_commands(&mut sink).unwrap().as_deref(),
            Some("/x")
        );
    }

    #[test]
    fn test_session_resolves_overrides_and_answers_property_queries() {
        let generator = CommandLineGenerator::new(["Warnings", "WarningLevel"]);
        let mut session = CommandLineSession::new(
            &generator,
            switches(vec![
                Switch::enumeration("Warnings", "/w").with_override("w", "W4"),
                Switch::enumeration("WarningLevel", "/W4"),
            ]),
        );
        assert!(session.is_property_set("warnings"));
        assert!(!session.is_property_set("WarningLevel"));
        let mut sink = CollectingSink::new();
        assert_eq!(session.generate_command_line(&mut sink).unwrap(), "/w");
    }

    #[test]
    fn test_generation_error_leaves_session_unrendered() {
        let generator = CommandLineGenerator::new(Vec::<String>::new());
        let mut session = CommandLineSession::new(
            &generator,
            switches(vec![Switch::always_append("Pch", "/Yc").with_argument("PchFile", true)]),
        );
        let mut sink = CollectingSink::new();
        assert!(session.direct_command(&mut sink).is_err());
        assert_eq!(session.state(), RenderState::NotRendered);
    }
}
