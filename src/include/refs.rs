//! Rewriting of cross-file `$ref` pointers into document-local fragments
//!
//! Once several files are merged into one document, a reference such as
//! `"$ref": "../schemas/user.yaml#/components/schemas/User"` points at a file
//! that is no longer separate. Dropping the path part leaves
//! `"$ref": "#/components/schemas/User"`, which resolves inside the merged
//! output.
//!
//! The transform is textual: it handles `$ref` values on a single line in
//! single or double quotes, with or without a quoted key. Text that merely
//! looks like a `$ref` pair inside a longer string is rewritten as well.
//!
//! Values re-encoded by a selector lose their original quoting, so plain YAML
//! scalars (`$ref: ./user.yaml#/User`) are rewritten too. A plain value runs to
//! the end of the line and may contain spaces, but ` #` starts a comment. It
//! cannot start with `#` either, so the fragment is emitted single-quoted with
//! inner quotes doubled.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Double-quoted, single-quoted and plain values are independent alternatives
/// so that the closing quote always matches the opening one.
static REF_WITH_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<key_dq>"?\$ref"?\s*:\s*")(?P<path_dq>[^"]*?)(?P<frag_dq>#/[^"]*)(?P<close_dq>")"#,
        "|",
        r#"(?P<key_sq>"?\$ref"?\s*:\s*')(?P<path_sq>[^']*?)(?P<frag_sq>#/[^']*)(?P<close_sq>')"#,
        "|",
        r##"(?P<key_plain>"?\$ref"?[ \t]*:[ \t]+)(?P<path_plain>[^\s'"#\[\]{},][^\n#]*?)"##,
        r##"(?P<frag_plain>#/[^\s,\]}]*(?:[ \t]+[^\s#,\]}][^\s,\]}]*)*)"##,
    ))
    .expect("reference pattern is valid")
});

/// Strip file paths from every `$ref` value that carries a `#/` fragment
///
/// Everything that is not such a value is passed through unchanged, and
/// applying the rewrite twice gives the same result as applying it once.
pub fn rewrite_refs(input: &str) -> Cow<'_, str> {
    REF_WITH_PATH.replace_all(input, |caps: &Captures<'_>| {
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        if caps.name("key_dq").is_some() {
            format!("{}{}{}", group("key_dq"), group("frag_dq"), group("close_dq"))
        } else if caps.name("key_sq").is_some() {
            format!("{}{}{}", group("key_sq"), group("frag_sq"), group("close_sq"))
        } else {
            format!(
                "{}'{}'",
                group("key_plain"),
                group("frag_plain").replace('\'', "''")
            )
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_ref_replacement() {
        assert_eq!(
            rewrite_refs(r##""$ref": "file.json#/components/schemas/User""##),
            r##""$ref": "#/components/schemas/User""##
        );
    }

    #[test]
    fn test_ref_with_relative_path() {
        assert_eq!(
            rewrite_refs(r##""$ref": "../folder/file.yaml#/components/schemas/User""##),
            r##""$ref": "#/components/schemas/User""##
        );
    }

    #[test]
    fn test_unquoted_yaml_key() {
        assert_eq!(
            rewrite_refs(r##"- $ref: "../folder/file.yaml#/components/schemas/User""##),
            r##"- $ref: "#/components/schemas/User""##
        );
    }

    #[test]
    fn test_single_quotes_are_preserved() {
        assert_eq!(
            rewrite_refs("$ref: '../folder/file.yaml#/components/schemas/User'"),
            "$ref: '#/components/schemas/User'"
        );
    }

    #[test]
    fn test_plain_yaml_value_gets_quoted_fragment() {
        assert_eq!(
            rewrite_refs("items:\n  $ref: ../pets/pet.yaml#/components/schemas/Pet\n"),
            "items:\n  $ref: '#/components/schemas/Pet'\n"
        );
    }

    #[test]
    fn test_plain_value_with_space_in_path() {
        assert_eq!(
            rewrite_refs("schema:\n  $ref: ../s/a b.yaml#/components/schemas/A\nnext: 1\n"),
            "schema:\n  $ref: '#/components/schemas/A'\nnext: 1\n"
        );
    }

    #[test]
    fn test_plain_value_stops_at_comment() {
        assert_eq!(
            rewrite_refs("$ref: a.yaml#/components/schemas/A # shared\n"),
            "$ref: '#/components/schemas/A' # shared\n"
        );
    }

    #[test]
    fn test_plain_fragment_quote_is_doubled() {
        let out = rewrite_refs("$ref: a.yaml#/components/schemas/It's\n");
        assert_eq!(out, "$ref: '#/components/schemas/It''s'\n");

        let doc: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(doc["$ref"].as_str(), Some("#/components/schemas/It's"));
        assert_eq!(rewrite_refs(&out), out);
    }

    #[test]
    fn test_plain_value_without_fragment_is_untouched() {
        let input = "$ref: ./schemas/user.yaml\n$ref: plain#anchor\n";
        assert_eq!(rewrite_refs(input), input);
    }

    #[test]
    fn test_other_quote_inside_value() {
        assert_eq!(
            rewrite_refs(r##"$ref: "it's.yaml#/components/schemas/A""##),
            r##"$ref: "#/components/schemas/A""##
        );
    }

    #[test]
    fn test_no_ref() {
        let input = r##""something": "else""##;
        assert!(matches!(rewrite_refs(input), Cow::Borrowed(_)));
        assert_eq!(rewrite_refs(input), input);
    }

    #[test]
    fn test_ref_without_fragment_is_untouched() {
        let input = "$ref: './schemas/user.yaml'\n\"$ref\": \"other.json\"";
        assert_eq!(rewrite_refs(input), input);
    }

    #[test]
    fn test_local_fragment_is_untouched() {
        let input = r##"$ref: "#/components/schemas/User""##;
        assert_eq!(rewrite_refs(input), input);
    }

    #[test]
    fn test_multiple_refs() {
        let input = r##"{"$ref": "file1.json#/components/schemas/User",
					"$ref": "file2.json#/components/schemas/Post",
					"smth": "else"}"##;
        let want = r##"{"$ref": "#/components/schemas/User",
					"$ref": "#/components/schemas/Post",
					"smth": "else"}"##;
        assert_eq!(rewrite_refs(input), want);
    }

    #[test]
    fn test_whitespace_around_colon() {
        assert_eq!(
            rewrite_refs(r##""$ref" :  "common.yaml#/components/parameters/Limit""##),
            r##""$ref" :  "#/components/parameters/Limit""##
        );
    }

    #[test]
    fn test_idempotent() {
        let input = "paths:\n  /users:\n    $ref: 'paths/users.yaml#/paths/~1users'\n  /pets:\n    $ref: \"./pets.yaml#/paths/~1pets\"\n";
        let once = rewrite_refs(input).into_owned();
        assert_eq!(rewrite_refs(&once), once);
    }

    #[test]
    fn test_yaml_block_snapshot() {
        let input = r##"User:
  type: object
  properties:
    address:
      $ref: "./address.yaml#/components/schemas/Address"
    pets:
      type: array
      items:
        $ref: '../pets/pet.yaml#/components/schemas/Pet'
    avatar:
      $ref: './avatar.yaml'
"##;
        insta::assert_snapshot!(rewrite_refs(input), @r##"
        User:
          type: object
          properties:
            address:
              $ref: "#/components/schemas/Address"
            pets:
              type: array
              items:
                $ref: '#/components/schemas/Pet'
            avatar:
              $ref: './avatar.yaml'
        "##);
    }
}
