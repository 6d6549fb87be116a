//! Prompt templates with `{name}` placeholders.
//!
//! `{{` and `}}` stand for literal braces. Nothing else is special: no
//! nesting, no conditionals, no filters.

use crate::error::CoachError;
use std::collections::HashMap;

pub type Variables = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, CoachError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }

                    if !closed {
                        return Err(CoachError::InvalidTemplate(format!(
                            "unterminated placeholder at byte {pos}"
                        )));
                    }
                    if !is_valid_name(&name) {
                        return Err(CoachError::InvalidTemplate(format!(
                            "bad placeholder name '{name}' at byte {pos}"
                        )));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(CoachError::InvalidTemplate(format!(
                            "unmatched '}}' at byte {pos}"
                        )));
                    }
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, variables: &Variables) -> Result<String, CoachError> {
        let mut out = String::with_capacity(self.len_hint(variables));
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = variables
                        .get(name)
                        .ok_or_else(|| CoachError::MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    fn len_hint(&self, variables: &Variables) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Placeholder(name) => variables.get(name).map_or(0, String::len),
            })
            .sum()
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn splits_literals_and_placeholders() {
        let t = Template::parse("Problem: {problem}\nLanguage: {language}").unwrap();
        assert_eq!(
            t.segments(),
            &[
                Segment::Literal("Problem: ".into()),
                Segment::Placeholder("problem".into()),
                Segment::Literal("\nLanguage: ".into()),
                Segment::Placeholder("language".into()),
            ]
        );
        assert_eq!(t.placeholders().collect::<Vec<_>>(), vec!["problem", "language"]);
    }

    #[test]
    fn renders_values_in_place() {
        let t = Template::parse("Generate a {difficulty} problem involving {data_structure}.")
            .unwrap();
        let out = t
            .render(&vars(&[("difficulty", "medium"), ("data_structure", "graph")]))
            .unwrap();
        assert_eq!(out, "Generate a medium problem involving graph.");
    }

    #[test]
    fn repeated_placeholder_uses_same_value() {
        let t = Template::parse("```{language}\n...\n``` in {language}").unwrap();
        let out = t.render(&vars(&[("language", "rust")])).unwrap();
        assert_eq!(out, "```rust\n...\n``` in rust");
    }

    #[test]
    fn double_braces_are_literal() {
        let t = Template::parse("{{\"key\": \"{value}\"}}").unwrap();
        assert_eq!(t.render(&vars(&[("value", "x")])).unwrap(), "{\"key\": \"x\"}");
        assert_eq!(t.placeholders().count(), 1);
    }

    #[test]
    fn values_are_not_reinterpreted() {
        let t = Template::parse("Code so far:\n{code}").unwrap();
        let out = t.render(&vars(&[("code", "fn main() { {x} }")])).unwrap();
        assert_eq!(out, "Code so far:\nfn main() { {x} }");
    }

    #[test]
    fn rendering_is_idempotent() {
        let t = Template::parse("Problem: {problem}\nSolution: {solution}").unwrap();
        let v = vars(&[("problem", "two sum"), ("solution", "use a map")]);
        assert_eq!(t.render(&v).unwrap(), t.render(&v).unwrap());
    }

    #[test]
    fn missing_variable_names_first_unresolved() {
        let t = Template::parse("{a} {b} {c}").unwrap();
        let err = t.render(&vars(&[("a", "1")])).unwrap_err();
        assert!(matches!(err, CoachError::MissingVariable(ref n) if n == "b"));
    }

    #[test]
    fn missing_variable_fails_regardless_of_extras() {
        let t = Template::parse("Problem: {problem}\nCode so far:\n{code}").unwrap();
        let mut v = vars(&[("problem", "p")]);
        for i in 0..50 {
            v.insert(format!("extra_{i}"), "noise".into());
        }
        for _ in 0..3 {
            let err = t.render(&v).unwrap_err();
            assert!(matches!(err, CoachError::MissingVariable(ref n) if n == "code"));
        }
    }

    #[test]
    fn rejects_malformed_sources() {
        for bad in ["open {name", "{}", "{bad name}", "{a-b}", "stray } brace"] {
            let err = Template::parse(bad).unwrap_err();
            assert!(matches!(err, CoachError::InvalidTemplate(_)), "accepted {bad:?}");
        }
    }

    #[test]
    fn plain_text_has_no_placeholders() {
        let t = Template::parse("no variables [here]").unwrap();
        assert_eq!(t.placeholders().count(), 0);
        assert_eq!(t.render(&Variables::new()).unwrap(), "no variables [here]");
    }
}
