//! Static element catalog: the 118 cells of the periodic table.
//!
//! Lanthanides (57–71) and actinides (89–103) carry no group number; they live
//! in the detached f-block rows below the main table and are ordered by atomic
//! number within their series.

use serde::{Deserialize, Serialize};

pub const ELEMENT_COUNT: usize = 118;

/// First atomic number of each f-block series.
pub const LANTHANIDE_START: u8 = 57;
pub const LANTHANIDE_END: u8 = 71;
pub const ACTINIDE_START: u8 = 89;
pub const ACTINIDE_END: u8 = 103;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    S,
    P,
    D,
    F,
}

impl Block {
    pub const fn letter(self) -> char {
        match self {
            Block::S => 'S',
            Block::P => 'P',
            Block::D => 'D',
            Block::F => 'F',
        }
    }
}

/// Serialized with the same spelling as `label`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(rename = "alkali metal")]
    AlkaliMetal,
    #[serde(rename = "alkaline earth metal")]
    AlkalineEarthMetal,
    #[serde(rename = "transition metal")]
    TransitionMetal,
    #[serde(rename = "post-transition metal")]
    PostTransitionMetal,
    Metalloid,
    Nonmetal,
    Halogen,
    #[serde(rename = "noble gas")]
    NobleGas,
    Lanthanide,
    Actinide,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::AlkaliMetal => "alkali metal",
            Category::AlkalineEarthMetal => "alkaline earth metal",
            Category::TransitionMetal => "transition metal",
            Category::PostTransitionMetal => "post-transition metal",
            Category::Metalloid => "metalloid",
            Category::Nonmetal => "nonmetal",
            Category::Halogen => "halogen",
            Category::NobleGas => "noble gas",
            Category::Lanthanide => "lanthanide",
            Category::Actinide => "actinide",
        }
    }

    /// Lanthanides and actinides: the detached f-block rows.
    pub const fn is_f_series(self) -> bool {
        matches!(self, Category::Lanthanide | Category::Actinide)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub period: u8,
    pub group: Option<u8>,
    pub block: Block,
    pub category: Category,
}

impl Element {
    /// Case-insensitive symbol check; surrounding whitespace is ignored.
    pub fn matches_symbol(&self, guess: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(guess.trim())
    }

    /// Offset inside the lanthanide / actinide series (0..=14), `None` for the main table.
    pub fn f_series_offset(&self) -> Option<u8> {
        match self.category {
            Category::Lanthanide => Some(self.atomic_number - LANTHANIDE_START),
            Category::Actinide => Some(self.atomic_number - ACTINIDE_START),
            _ => None,
        }
    }
}

const fn el(
    atomic_number: u8,
    symbol: &'static str,
    name: &'static str,
    period: u8,
    group: u8,
    block: Block,
    category: Category,
) -> Element {
    Element {
        atomic_number,
        symbol,
        name,
        period,
        // group 0 marks the f-block series (no group)
        group: if group == 0 { None } else { Some(group) },
        block,
        category,
    }
}

use Block::{D, F, P, S};
use Category::{
    Actinide as AC, AlkaliMetal as AK, AlkalineEarthMetal as AE, Halogen as HA, Lanthanide as LA,
    Metalloid as MD, NobleGas as NG, Nonmetal as NM, PostTransitionMetal as PT,
    TransitionMetal as TM,
};

pub static ELEMENTS: [Element; ELEMENT_COUNT] = [
    // --- Period 1 ---
    el(1, "H", "Hydrogen", 1, 1, S, NM),
    el(2, "He", "Helium", 1, 18, S, NG),
    // --- Period 2 ---
    el(3, "Li", "Lithium", 2, 1, S, AK),
    el(4, "Be", "Beryllium", 2, 2, S, AE),
    el(5, "B", "Boron", 2, 13, P, MD),
    el(6, "C", "Carbon", 2, 14, P, NM),
    el(7, "N", "Nitrogen", 2, 15, P, NM),
    el(8, "O", "Oxygen", 2, 16, P, NM),
    el(9, "F", "Fluorine", 2, 17, P, HA),
    el(10, "Ne", "Neon", 2, 18, P, NG),
    // --- Period 3 ---
    el(11, "Na", "Sodium", 3, 1, S, AK),
    el(12, "Mg", "Magnesium", 3, 2, S, AE),
    el(13, "Al", "Aluminium", 3, 13, P, PT),
    el(14, "Si", "Silicon", 3, 14, P, MD),
    el(15, "P", "Phosphorus", 3, 15, P, NM),
    el(16, "S", "Sulfur", 3, 16, P, NM),
    el(17, "Cl", "Chlorine", 3, 17, P, HA),
    el(18, "Ar", "Argon", 3, 18, P, NG),
    // --- Period 4 ---
    el(19, "K", "Potassium", 4, 1, S, AK),
    el(20, "Ca", "Calcium", 4, 2, S, AE),
    el(21, "Sc", "Scandium", 4, 3, D, TM),
    el(22, "Ti", "Titanium", 4, 4, D, TM),
    el(23, "V", "Vanadium", 4, 5, D, TM),
    el(24, "Cr", "Chromium", 4, 6, D, TM),
    el(25, "Mn", "Manganese", 4, 7, D, TM),
    el(26, "Fe", "Iron", 4, 8, D, TM),
    el(27, "Co", "Cobalt", 4, 9, D, TM),
    el(28, "Ni", "Nickel", 4, 10, D, TM),
    el(29, "Cu", "Copper", 4, 11, D, TM),
    el(30, "Zn", "Zinc", 4, 12, D, TM),
    el(31, "Ga", "Gallium", 4, 13, P, PT),
    el(32, "Ge", "Germanium", 4, 14, P, MD),
    el(33, "As", "Arsenic", 4, 15, P, MD),
    el(34, "Se", "Selenium", 4, 16, P, NM),
    el(35, "Br", "Bromine", 4, 17, P, HA),
    el(36, "Kr", "Krypton", 4, 18, P, NG),
    // --- Period 5 ---
    el(37, "Rb", "Rubidium", 5, 1, S, AK),
    el(38, "Sr", "Strontium", 5, 2, S, AE),
    el(39, "Y", "Yttrium", 5, 3, D, TM),
    el(40, "Zr", "Zirconium", 5, 4, D, TM),
    el(41, "Nb", "Niobium", 5, 5, D, TM),
    el(42, "Mo", "Molybdenum", 5, 6, D, TM),
    el(43, "Tc", "Technetium", 5, 7, D, TM),
    el(44, "Ru", "Ruthenium", 5, 8, D, TM),
    el(45, "Rh", "Rhodium", 5, 9, D, TM),
    el(46, "Pd", "Palladium", 5, 10, D, TM),
    el(47, "Ag", "Silver", 5, 11, D, TM),
    el(48, "Cd", "Cadmium", 5, 12, D, TM),
    el(49, "In", "Indium", 5, 13, P, PT),
    el(50, "Sn", "Tin", 5, 14, P, PT),
    el(51, "Sb", "Antimony", 5, 15, P, MD),
    el(52, "Te", "Tellurium", 5, 16, P, MD),
    el(53, "I", "Iodine", 5, 17, P, HA),
    el(54, "Xe", "Xenon", 5, 18, P, NG),
    // --- Period 6 ---
    el(55, "Cs", "Caesium", 6, 1, S, AK),
    el(56, "Ba", "Barium", 6, 2, S, AE),
    el(57, "La", "Lanthanum", 6, 0, F, LA),
    el(58, "Ce", "Cerium", 6, 0, F, LA),
    el(59, "Pr", "Praseodymium", 6, 0, F, LA),
    el(60, "Nd", "Neodymium", 6, 0, F, LA),
    el(61, "Pm", "Promethium", 6, 0, F, LA),
    el(62, "Sm", "Samarium", 6, 0, F, LA),
    el(63, "Eu", "Europium", 6, 0, F, LA),
    el(64, "Gd", "Gadolinium", 6, 0, F, LA),
    el(65, "Tb", "Terbium", 6, 0, F, LA),
    el(66, "Dy", "Dysprosium", 6, 0, F, LA),
    el(67, "Ho", "Holmium", 6, 0, F, LA),
    el(68, "Er", "Erbium", 6, 0, F, LA),
    el(69, "Tm", "Thulium", 6, 0, F, LA),
    el(70, "Yb", "Ytterbium", 6, 0, F, LA),
    el(71, "Lu", "Lutetium", 6, 0, F, LA),
    el(72, "Hf", "Hafnium", 6, 4, D, TM),
    el(73, "Ta", "Tantalum", 6, 5, D, TM),
    el(74, "W", "Tungsten", 6, 6, D, TM),
    el(75, "Re", "Rhenium", 6, 7, D, TM),
    el(76, "Os", "Osmium", 6, 8, D, TM),
    el(77, "Ir", "Iridium", 6, 9, D, TM),
    el(78, "Pt", "Platinum", 6, 10, D, TM),
    el(79, "Au", "Gold", 6, 11, D, TM),
    el(80, "Hg", "Mercury", 6, 12, D, TM),
    el(81, "Tl", "Thallium", 6, 13, P, PT),
    el(82, "Pb", "Lead", 6, 14, P, PT),
    el(83, "Bi", "Bismuth", 6, 15, P, PT),
    el(84, "Po", "Polonium", 6, 16, P, PT),
    el(85, "At", "Astatine", 6, 17, P, HA),
    el(86, "Rn", "Radon", 6, 18, P, NG),
    // --- Period 7 ---
    el(87, "Fr", "Francium", 7, 1, S, AK),
    el(88, "Ra", "Radium", 7, 2, S, AE),
    el(89, "Ac", "Actinium", 7, 0, F, AC),
    el(90, "Th", "Thorium", 7, 0, F, AC),
    el(91, "Pa", "Protactinium", 7, 0, F, AC),
    el(92, "U", "Uranium", 7, 0, F, AC),
    el(93, "Np", "Neptunium", 7, 0, F, AC),
    el(94, "Pu", "Plutonium", 7, 0, F, AC),
    el(95, "Am", "Americium", 7, 0, F, AC),
    el(96, "Cm", "Curium", 7, 0, F, AC),
    el(97, "Bk", "Berkelium", 7, 0, F, AC),
    el(98, "Cf", "Californium", 7, 0, F, AC),
    el(99, "Es", "Einsteinium", 7, 0, F, AC),
    el(100, "Fm", "Fermium", 7, 0, F, AC),
    el(101, "Md", "Mendelevium", 7, 0, F, AC),
    el(102, "No", "Nobelium", 7, 0, F, AC),
    el(103, "Lr", "Lawrencium", 7, 0, F, AC),
    el(104, "Rf", "Rutherfordium", 7, 4, D, TM),
    el(105, "Db", "Dubnium", 7, 5, D, TM),
    el(106, "Sg", "Seaborgium", 7, 6, D, TM),
    el(107, "Bh", "Bohrium", 7, 7, D, TM),
    el(108, "Hs", "Hassium", 7, 8, D, TM),
    el(109, "Mt", "Meitnerium", 7, 9, D, TM),
    el(110, "Ds", "Darmstadtium", 7, 10, D, TM),
    el(111, "Rg", "Roentgenium", 7, 11, D, TM),
    el(112, "Cn", "Copernicium", 7, 12, D, TM),
    el(113, "Nh", "Nihonium", 7, 13, P, PT),
    el(114, "Fl", "Flerovium", 7, 14, P, PT),
    el(115, "Mc", "Moscovium", 7, 15, P, PT),
    el(116, "Lv", "Livermorium", 7, 16, P, PT),
    el(117, "Ts", "Tennessine", 7, 17, P, HA),
    el(118, "Og", "Oganesson", 7, 18, P, NG),
];

/// Lookup by atomic number (1..=118).
pub fn element(atomic_number: u8) -> Option<&'static Element> {
    match atomic_number {
        0 => None,
        n => ELEMENTS.get(n as usize - 1),
    }
}

pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.matches_symbol(symbol))
}

pub fn all_atomic_numbers() -> impl Iterator<Item = u8> {
    ELEMENTS.iter().map(|e| e.atomic_number)
}

/// Input formatting applied while typing: `"fE"` -> `"Fe"`.
pub fn format_symbol(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Hint text shown for a cell (block and category, never the symbol).
pub fn hint_text(element: &Element) -> String {
    format!(
        "Block: {}-block | Category: {}",
        element.block.letter(),
        element.category.label()
    )
}
