//! Options offered by the form and filter dropdowns.

use super::{JobFunction, Role};

/// One dropdown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub label: &'static str,
    pub value: T,
}

/// Enumerated choices passed into the validator and form construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    pub function_options: Vec<SelectOption<JobFunction>>,
    pub role_options: Vec<SelectOption<Role>>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::new(JobFunction::ALL.to_vec(), Role::ALL.to_vec())
    }
}

impl FormOptions {
    pub fn new(functions: Vec<JobFunction>, roles: Vec<Role>) -> Self {
        Self {
            function_options: functions
                .into_iter()
                .map(|value| SelectOption {
                    label: value.label(),
                    value,
                })
                .collect(),
            role_options: roles
                .into_iter()
                .map(|value| SelectOption {
                    label: value.label(),
                    value,
                })
                .collect(),
        }
    }

    pub fn allows_function(&self, function: JobFunction) -> bool {
        self.function_options.iter().any(|o| o.value == function)
    }

    pub fn allows_role(&self, role: Role) -> bool {
        self.role_options.iter().any(|o| o.value == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offers_everything() {
        let options = FormOptions::default();
        assert_eq!(options.function_options.len(), 4);
        assert_eq!(options.role_options.len(), 2);
        assert_eq!(options.function_options[0].label, "Marketing & Sales");
        assert!(JobFunction::ALL.iter().all(|f| options.allows_function(*f)));
    }

    #[test]
    fn test_subset() {
        let options = FormOptions::new(vec![JobFunction::Engineering], vec![Role::Contributor]);
        assert!(options.allows_function(JobFunction::Engineering));
        assert!(!options.allows_function(JobFunction::It));
        assert!(!options.allows_role(Role::Admin));
    }
}
