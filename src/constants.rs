//! Markers, banners, column layouts and defaults for the VFP file formats
//!
//! Everything a parser matches on literally lives here, so the text the
//! solver prints and the text the parsers look for can be compared in one
//! place.

// =============================================================================
// File Kinds
// =============================================================================

/// Extensions recognised as solver files (compared case-insensitively)
pub mod extensions {
    pub const GEO: &str = "geo";
    pub const MAP: &str = "map";
    pub const FLOW: &str = "dat";
    pub const FORCES: &str = "forces";
    pub const CP: &str = "cp";
    pub const VIS: &str = "vis";
}

/// Wave drag output files carry no extension, only this file name prefix
pub const WAVEDRAG_PREFIX: &str = "wavedrg";

// =============================================================================
// GEO Layout
// =============================================================================

/// GEO fixed-column layout (Fortran `F10.x` / `I5` edit descriptors)
pub mod geo {
    /// Width of every real field
    pub const REAL_WIDTH: usize = 10;

    /// Width of every integer field
    pub const INT_WIDTH: usize = 5;

    /// Decimal places for section scalars and surface coordinates
    pub const COORDINATE_PRECISION: usize = 6;

    /// Decimal places for fuselage radius pairs and their end conditions
    pub const RADIUS_PRECISION: usize = 4;

    /// Decimal places for the `DSEND` end conditions on line 1
    pub const HEADER_PRECISION: usize = 5;

    /// Default `NSECT1` written when a model carries no header
    pub const DEFAULT_NSECT1: i32 = 2;

    /// Default `(ISEND, DSEND)` end condition
    pub const DEFAULT_SECTION_END: (i32, f64) = (-1, 0.0);

    /// Default `(IREND, DREND)` end conditions for the fuselage trailer
    pub const DEFAULT_RADIUS_ENDS: [(i32, f64); 2] = [(1, 0.0), (2, 0.0)];

    /// Number of `(ISEND, DSEND)` pairs on line 1
    pub const SECTION_END_PAIRS: usize = 4;

    /// Trailer written when the geometry has no fuselage
    pub const EMPTY_TRAILER: &[&str] = &[
        "   0",
        "",
        "",
        "",
        "",
        "     0    0       0.0    0       0.0",
    ];
}

// =============================================================================
// Flow Condition Layout
// =============================================================================

/// Flow condition (`.dat`) layout
pub mod flow {
    /// Every level block spans exactly this many lines
    pub const BLOCK_LINES: usize = 15;

    /// First token of a level block's header line
    pub const LEVEL_TOKEN: &str = "2";

    /// Whitespace field of the level header holding the Mach number
    pub const MACH_FIELD: usize = 1;

    /// Whitespace field of the level header holding the angle of attack
    pub const AOA_FIELD: usize = 2;

    /// Whitespace field whose leading digit marks a continuation run
    pub const RESTART_FIELD: usize = 4;

    /// Decimal places used when matching and writing Mach and AoA
    pub const CONDITION_PRECISION: usize = 4;

    /// Angles closer to zero than this keep every level in a sweep
    pub const ZERO_AOA_TOLERANCE: f64 = 1e-8;

    /// Sibling directory receiving sweep members when none is given
    pub const SWEEP_DIR: &str = "Flow_Conditions";
}

// =============================================================================
// Solver Report Markers
// =============================================================================

/// Tokens shared by the forces, cp and vis reports
pub mod report {
    /// Every level header carries this token
    pub const LEVEL_MARKER: &str = "LEV=";

    /// Level header labels
    pub const ITERATIONS_LABEL: &str = "ITS";
    pub const MACH_LABEL: &str = "MACH NO";
    pub const ALPHA_LABEL: &str = "ALPHA";
}

/// Forces report markers and columns
pub mod forces {
    /// Spanwise table column header
    pub const TABLE_HEADER: &str = "J   YAVE";

    /// Any line carrying this stops the spanwise table
    pub const SUMMARY_TOKEN: &str = "CLTOT";

    /// Spanwise table columns
    pub const TABLE_COLUMNS: &[&str] = &[
        "J",
        "YAVE",
        "YAVE/YTIP",
        "TWIST(deg)",
        "CHORD",
        "CL",
        "CD",
        "CM",
        "GAM",
        "NLEPOS",
    ];

    /// Coefficient group signatures
    pub const VFP_SIGNATURE: &str = "CLTOT(VFP)";
    pub const IBE_SIGNATURE: &str = "CLTOT(IBE)";
    pub const VORTEX_SIGNATURE: &str = "CL(vortd)";

    /// VFP group labels
    pub const VFP_CL: &str = "CLTOT(VFP)";
    pub const VFP_CD: &str = "CDTOT(VFP)";
    pub const VFP_CM: &str = "CMTOT(VFP)";
    pub const WING_AREA: &str = "WING AREA(TOTAL)";

    /// IBE group labels
    pub const IBE_CL: &str = "CLTOT(IBE)";
    pub const IBE_CD: &str = "CDTOT(IBE)";

    /// Vortex drag group labels
    pub const VORTEX_CL: &str = "CL(vortd)";
    pub const VORTEX_CD: &str = "CD(vortd)";
    pub const VORTEX_DCD: &str = "DCD(vortd)";

    /// Viscous drag sub-table
    pub const VISCOUS_BANNER: &str = "VISCOUS DRAG DATA";
    pub const VISCOUS_HEADER_TOKEN: &str = "THETA";
    pub const VISCOUS_TOTAL: &str = "Total viscous drag";
    pub const VISCOUS_TOTAL_TE: &str = "Total viscous drag te";
    pub const VISCOUS_COLUMNS: &[&str] = &[
        "J-2",
        "THETA",
        "CHORD",
        "SWEEP(L/E)",
        "SWEEP(T/E)",
        "CDV",
        "CDVC/CBAR",
        "CDVTE",
        "CDVTEC/CBAR",
    ];
}

/// Cp report markers and columns
pub mod cp {
    pub const SECTION_MARKER: &str = "J=";
    pub const UPPER_SHEET_BANNER: &str = "UPPER SURFACE OF VORTEX SHEET";
    pub const LOWER_SHEET_BANNER: &str = "LOWER SURFACE OF VORTEX SHEET";

    /// Station header labels
    pub const STATION_LABELS: &[&str] = &["YAVE", "CL", "CD", "CM", "CHORD", "TWIST", "GAM"];

    /// Main surface table columns
    pub const TABLE_COLUMNS: &[&str] = &[
        "X/C", "Z/C", "CP", "P/H", "M", "Q", "PHI(I=L)", "Y/YTIP", "XPHYS", "ZPHYS", "VT", "VALP",
    ];

    /// Vortex sheet rows: position plus one four-value group per surface
    pub const WAKE_COLUMNS: usize = 10;
}

/// Vis report markers and columns
pub mod vis {
    pub const SECTION_MARKER: &str = "Span j-2";
    pub const SPAN_LABEL: &str = "Span j-2";
    pub const ETA_LABEL: &str = "eta";
    pub const CHORD_LABEL: &str = "Chord";

    pub const MACH_LINE: &str = "MACH NUMBER";
    pub const INCIDENCE_LINE: &str = "INCIDENCE";
    pub const REYNOLDS_LINE: &str = "REYNOLDS NUMBER";

    /// Boundary layer table columns
    pub const TABLE_COLUMNS: &[&str] = &[
        "I", "x/c", "Cp", "Uinv", "Uvis", "Theta/c", "Dis/c", "H", "Cf", "V/Ue", "Flow-Ang",
        "Beta", "Vn", "DVn",
    ];
}

/// Wave drag report
pub mod wavedrag {
    pub const TOTAL_LABEL: &str = "Total wave drag for block is CDW(tot)";
}

/// Map (`.map`) header file
pub mod map {
    /// Everything from this line on is format documentation
    pub const FORMAT_FOOTER: &str = "LINE: FORMAT:";
}
