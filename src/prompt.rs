//! Prompt optimization

/// Tag enclosing the text the instruction applies to
pub const INPUT_TAG: &str = "textshape-input";

/// Directive pointing the model at the tagged input
pub const INPUT_DIRECTIVE: &str
  = "The subject of the Instruction is the area enclosed by the textshape-input tag.";

/// Directive pinning the answer language
pub const LANGUAGE_DIRECTIVE: &str
  = "The result should be returned in the language of the Instruction, \
     but if the Instruction has a language specification, that language \
     should be given priority.";

/// Directive suppressing unrequested explanations
pub const EXPLANATION_DIRECTIVE: &str
  = "Provide additional explanations or details only if explicitly \
     requested in the Instruction.";

/// Wrap an instruction and its input into one structured prompt
///
/// The input is embedded verbatim. An input that itself contains the
/// closing tag is not escaped.
pub fn optimize_prompt(prompt: &str, input: &str) -> String
{   let supplementation = [
      INPUT_DIRECTIVE
    , LANGUAGE_DIRECTIVE
    , EXPLANATION_DIRECTIVE
    ].join(" ");
    format!(
      "<Instruction>{prompt}. ({supplementation})</Instruction>\n\
       <{tag}>{input}</{tag}>"
    , tag = INPUT_TAG
    )
}
