use super::template::{Template, Variables};
use crate::error::CoachError;
use std::collections::BTreeSet;

pub const PROBLEM_PROMPT: &str = r#"
Generate a {difficulty} data structure problem involving {data_structure}.
Provide a clear problem description with instructions and constraints.
Format your response as follows:

1. Problem Title:
   [Provide a concise title for the problem]

2. Description:
   [Detailed problem description]

3. Input:
   [Describe the input format]

4. Output:
   [Describe the expected output format]

5. Constraints:
   - [List any constraints or limitations]

6. Example:
   Input: [Provide a sample input]
   Output: [Provide the corresponding output]

7. Notes:
   [Any additional information or hints]
"#;

pub const SOLUTION_PROMPT: &str = r#"You are an expert programmer. Given the following problem and programming language, provide a detailed solution:

Problem: {problem}
Language: {language}

Please provide a step-by-step solution with explanations and the final code. Format your response as follows:
1. Problem Understanding:
   [Explain the problem and its requirements]
2. Approach:
   [Describe the approach to solve the problem]
3. Step-by-step Solution:
   [Provide a detailed step-by-step explanation]
4. Code:
   ```{language}
   [Provide the complete code solution]
   ```
5. Time and Space Complexity:
   [Analyze the time and space complexity]
6. Additional Notes:
   [Any extra information or optimization tips]"#;

pub const HINTS_PROMPT: &str = r#"Problem: {problem}
Code so far:
{code}
Provide 3 helpful hints to solve this problem, formatted as follows:
1. [First hint]
2. [Second hint]
3. [Third hint]"#;

pub const EVALUATION_PROMPT: &str = r#"
Evaluate the following solution:

Problem: {problem}
Solution: {solution}

Provide a detailed feedback response, formatted as follows:

1. Correctness:
   [State if the solution is correct or not, and explain why]

2. Code Quality:
   [Evaluate the code quality, readability, and adherence to best practices]

3. Efficiency:
   [Analyze the time and space complexity]

4. Suggestions for Improvement:
   - [List specific suggestions for improving the solution]

5. Alternative Approaches:
   [Mention any alternative approaches, if applicable]

6. Learning Opportunities:
   [Suggest related concepts or problems for further learning]
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    GenerateProblem,
    GetSolution,
    GetHints,
    EvaluateSolution,
}

impl UseCase {
    pub const ALL: [UseCase; 4] = [
        UseCase::GenerateProblem,
        UseCase::GetSolution,
        UseCase::GetHints,
        UseCase::EvaluateSolution,
    ];

    /// Stable name, also the HTTP route segment.
    pub fn name(self) -> &'static str {
        match self {
            UseCase::GenerateProblem => "generate-problem",
            UseCase::GetSolution => "get-ai-solution",
            UseCase::GetHints => "get-hints",
            UseCase::EvaluateSolution => "submit-solution",
        }
    }

    pub fn route(self) -> String {
        format!("/{}", self.name())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Maps an inbound JSON field onto a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: &'static str,
    pub variable: &'static str,
}

const fn bind(field: &'static str, variable: &'static str) -> FieldBinding {
    FieldBinding { field, variable }
}

struct PromptRow {
    use_case: UseCase,
    template: &'static str,
    inputs: &'static [FieldBinding],
    missing_message: &'static str,
}

const ROWS: [PromptRow; 4] = [
    PromptRow {
        use_case: UseCase::GenerateProblem,
        template: PROBLEM_PROMPT,
        inputs: &[
            bind("dataStructure", "data_structure"),
            bind("difficulty", "difficulty"),
        ],
        missing_message: "Missing dataStructure or difficulty",
    },
    PromptRow {
        use_case: UseCase::GetSolution,
        template: SOLUTION_PROMPT,
        inputs: &[bind("problem", "problem"), bind("language", "language")],
        missing_message: "Missing problem or language",
    },
    PromptRow {
        use_case: UseCase::GetHints,
        template: HINTS_PROMPT,
        inputs: &[bind("problem", "problem"), bind("currentCode", "code")],
        missing_message: "Problem and code are required.",
    },
    PromptRow {
        use_case: UseCase::EvaluateSolution,
        template: EVALUATION_PROMPT,
        inputs: &[bind("problem", "problem"), bind("solution", "solution")],
        missing_message: "Missing problem or solution",
    },
];

#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub use_case: UseCase,
    pub template: Template,
    pub required: BTreeSet<&'static str>,
    pub inputs: &'static [FieldBinding],
    pub missing_message: &'static str,
}

impl PromptSpec {
    pub fn render(&self, variables: &Variables) -> Result<String, CoachError> {
        self.template.render(variables)
    }
}

#[derive(Debug, Clone)]
pub struct PromptCatalog {
    specs: Vec<PromptSpec>,
}

impl PromptCatalog {
    pub fn load() -> Result<Self, CoachError> {
        Self::from_rows(&ROWS)
    }

    fn from_rows(rows: &[PromptRow]) -> Result<Self, CoachError> {
        if rows.len() != UseCase::ALL.len() {
            return Err(CoachError::InvalidTemplate(format!(
                "catalog has {} rows, expected {}",
                rows.len(),
                UseCase::ALL.len()
            )));
        }

        let mut specs = Vec::with_capacity(rows.len());

        for (row, expected) in rows.iter().zip(UseCase::ALL) {
            if row.use_case != expected {
                return Err(CoachError::InvalidTemplate(format!(
                    "catalog row for '{}' is out of order (expected '{}')",
                    row.use_case.name(),
                    expected.name()
                )));
            }

            let template = Template::parse(row.template)?;
            let required: BTreeSet<&'static str> =
                row.inputs.iter().map(|b| b.variable).collect();
            let used: BTreeSet<&str> = template.placeholders().collect();

            if used != required {
                return Err(CoachError::InvalidTemplate(format!(
                    "'{}' declares {:?} but its template uses {:?}",
                    row.use_case.name(),
                    required,
                    used
                )));
            }

            let spec = PromptSpec {
                use_case: row.use_case,
                template,
                required,
                inputs: row.inputs,
                missing_message: row.missing_message,
            };
            log::debug!("{} requires {:?}", spec.use_case.name(), spec.required);
            specs.push(spec);
        }

        log::debug!("Loaded {} prompt specs", specs.len());
        Ok(Self { specs })
    }

    pub fn get(&self, use_case: UseCase) -> &PromptSpec {
        &self.specs[use_case.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptSpec> {
        self.specs.iter()
    }
}
