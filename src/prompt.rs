//! Security-review prompt template

/// Build the instruction sent to the generative API.
///
/// Both inputs are embedded verbatim.
pub fn build_prompt(language: &str, code: &str) -> String {
    format!(
        "Analyze this {language} code for security vulnerabilities. \
         Keep the response concise and to the point. \
         For each issue, use this exact format:\n\
         1. **Vulnerability Name**\n\
         Brief explanation of the risk.\n\
         ```\n\
         // Corrected Code Snippet\n\
         ```\n\
         Do not include generic advice, only specific issues found in the code.\n\n\
         Code to analyze:\n{code}"
    )
}
