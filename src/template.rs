/// Replaces every literal occurrence of `{placeholder}` in `template` with
/// `value`.
///
/// No escaping and no recursive expansion: placeholders introduced by the
/// substituted value are left verbatim, as are `{other}` tokens that do not
/// match `placeholder`. A template without the placeholder is returned
/// unchanged.
pub fn expand(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(&format!("{{{placeholder}}}"), value)
}
