//! Line fragments and the trivial-code check

/// A contiguous slice of one line carrying a single coverage state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Raw bytes of the slice
    pub text: Vec<u8>,
    /// Execution count of the region the slice belongs to
    pub count: u64,
    /// Whether the slice is counted code
    pub has_code: bool,
    /// Whether the slice lies on the line where its region starts
    pub region_entry: bool,
}

impl Fragment {
    /// Create a fragment
    #[must_use]
    pub fn new(text: impl Into<Vec<u8>>, count: u64, has_code: bool, region_entry: bool) -> Self {
        Self {
            text: text.into(),
            count,
            has_code,
            region_entry,
        }
    }

    /// Whether this fragment counts as executable code
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        self.has_code && !is_trivial_code(&self.text)
    }

    /// Whether this fragment is executable code that ran
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.is_candidate() && self.count > 0
    }
}

/// How a fragment is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderClass {
    /// Not code, or trivial code
    None,
    /// Code that never ran
    Miss,
    /// Code that ran on a line that also has misses
    Partial,
    /// Code that ran on a fully covered line
    Full,
}

impl RenderClass {
    /// CSS class used by the HTML writer, if any
    #[must_use]
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Miss => Some("lineNoCov"),
            Self::Partial => Some("linePartCov"),
            Self::Full => Some("lineCov"),
        }
    }
}

/// Whether `code` is trivial and must never count toward coverage.
///
/// Trivial fragments are: empty or whitespace only, a lone `;`, a run of
/// braces with optional surrounding whitespace, and the lone `t` LLVM
/// attributes `= default;` to. Works on raw bytes; non-ASCII is never trivial.
#[must_use]
pub fn is_trivial_code(code: impl AsRef<[u8]>) -> bool {
    let code = code.as_ref();
    if code == b";" || code == b"t" {
        return true;
    }
    let mut rest = code
        .iter()
        .skip_while(|c| c.is_ascii_whitespace())
        .skip_while(|&&c| c == b'{' || c == b'}');
    rest.all(u8::is_ascii_whitespace)
}
