use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};

pub const SYSTEM_PROMPT: &str = "You are the most capable and efficient assistant, excelling in analyzing text accurately and providing structured outputs in JSON format.";

const DEVELOPMENT_TEAM_PROMPT: &str = r#"Analyze the following text and respond in JSON format:

1. Does the text mention **explicit** the development team?
2. Are any specific aspects of the development team mentioned (e.g., team size, geographic diversity, gender diversity, roles, expertise, etc.)? If yes, list the aspects mentioned.

Output format:
{
  "mention_to_dev_team": "yes/no",
  "profile_aspects": {
    "mentioned": "yes/no",
    "aspects": ["list of aspects if mentioned, otherwise empty"]
  }
}

Examples:

1. Input text: "The development team is composed of 5 engineers and 2 designers."
   Output:
   {
     "mention_to_dev_team": "yes",
     "profile_aspects": {
       "mentioned": "yes",
       "aspects": ["team size", "roles"]
     }
   }

2. Input text: "The development team includes engineers from the USA and Europe."
   Output:
   {
     "mention_to_dev_team": "yes",
     "profile_aspects": {
       "mentioned": "yes",
       "aspects": ["geographic diversity"]
     }
   }

3. Input text: "The team has a balanced composition of 40 % female and 60% male members."
   Output:
   {
     "mention_to_dev_team": "yes",
     "profile_aspects": {
       "mentioned": "yes",
       "aspects": ["gender diversity"]
     }
   }

4. Input text: "The development team worked tirelessly to complete the project on time."
   Output:
   {
     "mention_to_dev_team": "yes",
     "profile_aspects": {
       "mentioned": "no",
       "aspects": []
     }
   }

5. Input text: "There is no direct mention of the development team in this report."
   Output:
   {
     "mention_to_dev_team": "no",
     "profile_aspects": {
       "mentioned": "no",
       "aspects": []
     }
   }"#;

const NON_CODING_PROMPT: &str = r#"Analyze the following text and respond in JSON format:

  1. Does it **explicitly** mention non-coding contributors (such as Issue reporters, Advocates, Community managers, Documentors, or Translators)? (yes/no)
    - **Note**: Generic terms like "contributors" do not qualify. The mention must clearly identify specific roles such as those listed above.

  2. Are any roles of non-coding contributors explained? (yes/no)
    If yes, list the roles (e.g., Issue reporters, Advocates, Community managers, Documentors, or Translators).
    
Output format:
{
  "mention_non_coding_contributors": "yes/no",
  "non_coding_roles": {
    "explained": "yes/no",
    "roles": ["list of roles if mentioned, otherwise empty"]
  }
}

Examples:

1. Input text: "Community managers play a vital role in ensuring smooth collaboration in the project."
   Output:
   {
     "mention_non_coding_contributors": "yes",
     "non_coding_roles": {
       "explained": "yes",
       "roles": ["Community managers"]
     }
   }

2. Input text: "The project relied heavily on translators to make the documentation accessible to a global audience."
   Output:
   {
     "mention_non_coding_contributors": "yes",
     "non_coding_roles": {
       "explained": "yes",
       "roles": ["Translators"]
     }
   }

3. Input text: "Although the report focuses on developers, it does not elaborate on other contributors."
   Output:
   {
     "mention_non_coding_contributors": "yes",
     "non_coding_roles": {
       "explained": "no",
       "roles": []
     }
   }

4. Input text: "The document does not mention non-coding contributors or their roles in the project."
   Output:
   {
     "mention_non_coding_contributors": "no",
     "non_coding_roles": {
       "explained": "no",
       "roles": []
     }
   }

5. Input text: "Issue reporters and advocates collaborated to highlight the project's most critical needs."
   Output:
   {
     "mention_non_coding_contributors": "yes",
     "non_coding_roles": {
       "explained": "yes",
       "roles": ["Issue reporters", "Advocates"]
     }
   }"#;

const USER_TESTING_PROMPT: &str = r#"Analyze the following text and respond in JSON format:

1. Does it mention tests with potential users (e.g., crowd-testing, beta testers)? (yes/no)
2. If yes, does it mention the use of the labor force? (yes/no)
3. Is there any mention of beta reporters or reporting platforms (e.g., app reviews in app platforms)? (yes/no)

Output format:
{
  "mention_tests_with_users": "yes/no",
  "mention_labor_force": "yes/no",
  "mention_reporting_platforms": "yes/no"
}

Examples:

1. Input text: "The app underwent rigorous testing by beta testers, who provided feedback on its performance."
   Output:
   {
     "mention_tests_with_users": "yes",
     "mention_labor_force": "no",
     "mention_reporting_platforms": "no"
   }

2. Input text: "Crowd-testing was performed, utilizing a large pool of testers to identify usability issues."
   Output:
   {
     "mention_tests_with_users": "yes",
     "mention_labor_force": "yes",
     "mention_reporting_platforms": "no"
   }

3. Input text: "User feedback was collected through app reviews on major platforms like Google Play and the App Store."
   Output:
   {
     "mention_tests_with_users": "no",
     "mention_labor_force": "no",
     "mention_reporting_platforms": "yes"
   }

4. Input text: "The project does not rely on crowd-testing or beta testers for user feedback."
   Output:
   {
     "mention_tests_with_users": "no",
     "mention_labor_force": "no",
     "mention_reporting_platforms": "no"
   }

5. Input text: "Beta testers and crowd-testing were both utilized to gather insights, and app reviews on platforms helped refine the final version."
   Output:
   {
     "mention_tests_with_users": "yes",
     "mention_labor_force": "yes",
     "mention_reporting_platforms": "yes"
   }
}"#;

const DEPLOYMENT_CONTEXT_PROMPT: &str = r#"Analyze the following text and respond in JSON format:

1. Does the documentation **explicitly** mention any specific use case? (yes/no)  
   A specific use case refers to a clearly stated example of how the software is intended to be used (e.g., "Servers for school management systems", ...).  
   - If yes, list the specific use cases explicitly mentioned in the text.

2. Does the documentation **explicitly** mention any specific target population? (yes/no)  
   A target population refers to a clearly stated group of users for whom the software is designed (e.g., "healthcare workers,"  "students in schools", ...).  
   - **Do not infer or assume the target population** based on the software's features or technical focus. Only consider populations explicitly named in the text.
   - If yes, list the specific target populations explicitly mentioned in the text.

3. Does the documentation explicitly mention if the software is adapted to a specific population? (yes/no)
   Adaptation refers to clearly stated adjustments made to accommodate the needs of specific groups of people, such as linguistic groups (e.g., support for Catalan speakers), professional groups (e.g., tailored tools for teachers), or people with specific accessibility needs (e.g., blind or deaf users).
   - Do not include general technical features or inferred adaptations. Only consider explicit mentions of adjustments for particular populations.
   - If yes, list the specific adaptations made for the identified groups.

Output format:
{
  "mention_specific_use_case": "yes/no",
  "specific_use_cases": [list of specific use cases or empty array],
  "mention_target_population": "yes/no",
  "specific_target_populations": [list of specific target populations or empty array],
  "mention_specific_adaptation": "yes/no",
  "specific_adaptations": [list of specific adaptations or empty array]
}

Examples:

1. Input text: "This software does resumes and is designed to help teachers and students in schools complete their assignments efficiently."
   Output:
   {
     "mention_specific_use_case": "yes",
     "specific_use_cases": ["create resumes"],
     "mention_target_population": "yes",
     "specific_target_populations": ["teachers", "students in schools"],
     "mention_specific_adaptation": "no",
     "specific_adaptations": []
   }

2. Input text: "The website is adapted to ensure visually impaired users can navigate easily."
   Output:
   {
     "mention_specific_use_case": "no",
     "specific_use_cases": [],
     "mention_target_population": "no",
     "specific_target_populations": [],
     "mention_specific_adaptation": "yes",
     "specific_adaptations": ["adapted to ensure visually impaired users can navigate easily"]
   }

3. Input text: "This app is designed for children and has been adapted to include larger text for easier reading."
   Output:
   {
     "mention_specific_use_case": "no",
     "specific_use_cases": [],
     "mention_target_population": "yes",
     "specific_target_populations": ["children"],
     "mention_specific_adaptation": "yes",
     "specific_adaptations": ["adapted to include larger text for easier reading"]
   }

4. Input text: "The software is designed to report issues, help with coding, and is intended for new developers. The software supports Catalan speakers and is specifically adapted for users with visual impairments."
   Output:
   {
     "mention_specific_use_case": "yes",
     "specific_use_cases": ["report issues", "help with coding"],
     "mention_target_population": "yes",
     "specific_target_populations": ["new developers"],
     "mention_specific_adaptation": "yes",
     "specific_adaptations": ["adapted for Catalan speakers", "adapted for users with visual impairments"]
   }

5. Input text: "This software is specifically designed for healthcare professionals working in emergency settings."
   Output:
   {
     "mention_specific_use_case": "no",
     "specific_use_cases": [],
     "mention_target_population": "yes",
     "specific_target_populations": ["healthcare professionals"],
     "mention_specific_adaptation": "no",
     "specific_adaptations": []
   }"#;

const GOVERNANCE_PARTICIPANTS_PROMPT: &str = r#"Analyze the following text and respond in JSON format:

1. Does the documentation mention governance participants, either as individuals or as part of an organization? (yes/no)
   - Governance participants could include individuals (e.g., "Governance is handled by a board of community leaders") or organizations (e.g., "The project is overseen by Open Source Initiative").
2. Does the documentation mention the funders of the project? (yes/no)
   - Funders could be individuals or organizations (e.g., "The project is funded by the European Commission" or "John Doe provided financial support").

Output format:
{
  "mention_governance_participants": "yes/no",
  "mention_funders": "yes/no"
}

Examples:

1. Input text: "The governance committee includes representatives from NGOs and private companies."
   Output:
   {
     "mention_governance_participants": "yes",
     "mention_funders": "no"
   }

2. Input text: "Governance decisions are made by individuals with experience in community management."
   Output:
   {
     "mention_governance_participants": "yes",
     "mention_funders": "no"
   }

3. Input text: "The project is funded by the European Commission and several private donors."
   Output:
   {
     "mention_governance_participants": "no",
     "mention_funders": "yes"
   }


4. Input text: "No governance or funding-related information is provided in this documentation."
   Output:
   {
     "mention_governance_participants": "no",
     "mention_funders": "no"
   }

5. Input text: "The governance board is managed by the Open Source Initiative, and the project receives funding from the Mozilla Foundation."
   Output:
   {
     "mention_governance_participants": "yes",
     "mention_funders": "yes"
   }"#;

/// A named instruction sent to the text-generation backend; its id becomes the
/// key of the answer in the classification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub id: String,
    pub template: String,
}

impl PromptDefinition {
    pub fn new(id: &str, template: &str) -> Self {
        Self {
            id: id.to_string(),
            template: template.to_string(),
        }
    }

    pub fn render(&self, document: &str) -> String {
        format!("{}\n\nText to analyze:\n{}", self.template, document)
    }
}

/// Ordered, validated list of prompts. Ids are non-empty and unique.
#[derive(Debug, Clone)]
pub struct PromptSet {
    prompts: Vec<PromptDefinition>,
}

impl PromptSet {
    pub fn new(prompts: Vec<PromptDefinition>) -> Result<Self> {
        if prompts.is_empty() {
            return Err(Error::Config("prompt set must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for prompt in &prompts {
            if prompt.id.trim().is_empty() {
                return Err(Error::Config("prompt id must not be empty".to_string()));
            }
            if !seen.insert(prompt.id.as_str()) {
                return Err(Error::Config(format!("duplicate prompt id: {}", prompt.id)));
            }
        }

        Ok(Self { prompts })
    }

    pub fn builtin() -> Self {
        Self {
            prompts: vec![
                PromptDefinition::new("development_team", DEVELOPMENT_TEAM_PROMPT),
                PromptDefinition::new("non_coding_contributors", NON_CODING_PROMPT),
                PromptDefinition::new("tests_with_potential_users", USER_TESTING_PROMPT),
                PromptDefinition::new("deployment_context", DEPLOYMENT_CONTEXT_PROMPT),
                PromptDefinition::new("governance_participants", GOVERNANCE_PARTICIPANTS_PROMPT),
            ],
        }
    }

    /// Reads a YAML list of `{id, template}` entries.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let prompts: Vec<PromptDefinition> = serde_yaml::from_str(raw)
            .map_err(|e| Error::Config(format!("invalid prompts file: {}", e)))?;
        Self::new(prompts)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read prompts file {}: {}", path.display(), e))
                })?;
                Self::from_yaml(&raw)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PromptDefinition> {
        self.prompts.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.prompts.iter().map(|p| p.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids() {
        assert_eq!(
            PromptSet::builtin().ids(),
            vec![
                "development_team",
                "non_coding_contributors",
                "tests_with_potential_users",
                "deployment_context",
                "governance_participants",
            ]
        );
    }

    #[test]
    fn test_builtin_templates_carry_full_instructions() {
        assert!(SYSTEM_PROMPT.starts_with("You are the most capable and efficient assistant"));

        let set = PromptSet::builtin();
        let template = |id: &str| {
            set.iter()
                .find(|p| p.id == id)
                .map(|p| p.template.clone())
                .unwrap()
        };

        assert!(template("deployment_context")
            .contains("Do not include general technical features or inferred adaptations."));
        assert!(template("governance_participants")
            .contains("\"John Doe provided financial support\""));
        assert!(template("development_team").contains("5. Input text:"));

        for prompt in set.iter() {
            assert!(prompt.template.starts_with("Analyze the following text and respond in JSON format:"));
            assert!(!prompt.template.contains("6. Input text:"), "{}", prompt.id);
            assert!(prompt.template.trim_end().ends_with('}'), "{}", prompt.id);
        }
    }

    #[test]
    fn test_render_appends_document() {
        let prompt = PromptDefinition::new("p", "Say yes or no.");
        assert_eq!(
            prompt.render("# README"),
            "Say yes or no.\n\nText to analyze:\n# README"
        );
    }

    #[test]
    fn test_from_yaml() {
        let set = PromptSet::from_yaml(
            r#"
- id: governance
  template: Who governs this project?
- id: funding
  template: |
    Who funds this project?
"#,
        )
        .unwrap();
        assert_eq!(set.ids(), vec!["governance", "funding"]);
        assert_eq!(set.iter().nth(1).unwrap().template, "Who funds this project?\n");
    }

    #[test]
    fn test_invalid_sets_rejected() {
        assert!(PromptSet::new(vec![]).is_err());
        assert!(PromptSet::new(vec![
            PromptDefinition::new("a", "x"),
            PromptDefinition::new("a", "y"),
        ])
        .is_err());
        assert!(PromptSet::new(vec![PromptDefinition::new(" ", "x")]).is_err());
        assert!(PromptSet::from_yaml("id: not-a-list").unwrap_err().is_fatal());
    }
}
