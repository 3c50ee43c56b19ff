/// Normalizes a pathname for table lookup.
///
/// Trailing slashes are stripped, except that the root stays `/`. The empty
/// path and paths made only of slashes normalize to `/`.
pub fn normalize(pathname: &str) -> &str {
	let trimmed = pathname.trim_end_matches('/');
	if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn strips_trailing_slashes() {
		assert_eq!(normalize("/foo/"), "/foo");
		assert_eq!(normalize("/foo//"), "/foo");
		assert_eq!(normalize("/foo"), "/foo");
		assert_eq!(normalize("/a/b/"), "/a/b");
	}

	#[test]
	fn root_stays_root() {
		assert_eq!(normalize("/"), "/");
		assert_eq!(normalize("///"), "/");
		assert_eq!(normalize(""), "/");
	}

	proptest! {
		#[test]
		fn normalize_is_a_fixed_point(path in "[/a-z0-9._-]{0,24}") {
			let once = normalize(&path);
			prop_assert_eq!(normalize(once), once);
		}

		#[test]
		fn normalized_paths_never_end_in_slash_except_root(path in "/[/a-z]{0,16}") {
			let n = normalize(&path);
			prop_assert!(n == "/" || !n.ends_with('/'));
		}
	}
}
