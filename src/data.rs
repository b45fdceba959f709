// src/data.rs
// Static reaction catalog used to validate tally score keywords. Regular
// families of level-resolved reactions (n,n1..n40), (n,p0..p48), ... are
// generated rather than listed one by one.
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Reactions that do not belong to a level-resolved family.
const NAMED_REACTIONS: &[(i32, &str)] = &[
    (1, "(n,total)"),
    (2, "(n,elastic)"),
    (3, "(n,nonelastic)"),
    (4, "(n,level)"),
    (5, "(n,misc)"),
    (11, "(n,2nd)"),
    (16, "(n,2n)"),
    (17, "(n,3n)"),
    (18, "(n,fission)"),
    (19, "(n,f)"),
    (20, "(n,nf)"),
    (21, "(n,2nf)"),
    (22, "(n,na)"),
    (23, "(n,n3a)"),
    (24, "(n,2na)"),
    (25, "(n,3na)"),
    (27, "(n,absorption)"),
    (28, "(n,np)"),
    (29, "(n,n2a)"),
    (30, "(n,2n2a)"),
    (32, "(n,nd)"),
    (33, "(n,nt)"),
    (34, "(n,n3He)"),
    (35, "(n,nd2a)"),
    (36, "(n,nt2a)"),
    (37, "(n,4n)"),
    (38, "(n,3nf)"),
    (41, "(n,2np)"),
    (42, "(n,3np)"),
    (44, "(n,n2p)"),
    (45, "(n,npa)"),
    (91, "(n,nc)"),
    (101, "(n,disappear)"),
    (102, "(n,gamma)"),
    (103, "(n,p)"),
    (104, "(n,d)"),
    (105, "(n,t)"),
    (106, "(n,3He)"),
    (107, "(n,a)"),
    (108, "(n,2a)"),
    (109, "(n,3a)"),
    (111, "(n,2p)"),
    (112, "(n,pa)"),
    (113, "(n,t2a)"),
    (114, "(n,d2a)"),
    (115, "(n,pd)"),
    (116, "(n,pt)"),
    (117, "(n,da)"),
    (152, "(n,5n)"),
    (153, "(n,6n)"),
    (154, "(n,2nt)"),
    (155, "(n,ta)"),
    (156, "(n,4np)"),
    (157, "(n,3nd)"),
    (158, "(n,nda)"),
    (159, "(n,2npa)"),
    (160, "(n,7n)"),
    (161, "(n,8n)"),
    (162, "(n,5np)"),
    (163, "(n,6np)"),
    (164, "(n,7np)"),
    (165, "(n,4na)"),
    (166, "(n,5na)"),
    (167, "(n,6na)"),
    (168, "(n,7na)"),
    (169, "(n,4nd)"),
    (170, "(n,5nd)"),
    (171, "(n,6nd)"),
    (172, "(n,3nt)"),
    (173, "(n,4nt)"),
    (174, "(n,5nt)"),
    (175, "(n,6nt)"),
    (176, "(n,2n3He)"),
    (177, "(n,3n3He)"),
    (178, "(n,4n3He)"),
    (179, "(n,3n2p)"),
    (180, "(n,3n2a)"),
    (181, "(n,3npa)"),
    (182, "(n,dt)"),
    (183, "(n,npd)"),
    (184, "(n,npt)"),
    (185, "(n,ndt)"),
    (186, "(n,np3He)"),
    (187, "(n,nd3He)"),
    (188, "(n,nt3He)"),
    (189, "(n,nta)"),
    (190, "(n,2n2p)"),
    (191, "(n,p3He)"),
    (192, "(n,d3He)"),
    (193, "(n,3Hea)"),
    (194, "(n,4n2p)"),
    (195, "(n,4n2a)"),
    (196, "(n,4npa)"),
    (197, "(n,3p)"),
    (198, "(n,n3p)"),
    (199, "(n,3n2pa)"),
    (200, "(n,5n2p)"),
    (203, "(n,Xp)"),
    (204, "(n,Xd)"),
    (205, "(n,Xt)"),
    (206, "(n,X3He)"),
    (207, "(n,Xa)"),
    (301, "heating"),
    (444, "damage-energy"),
    (901, "heating-local"),
];

/// Level-resolved families: (first MT, product label, first level, last level).
/// The MT directly after the last level is the continuum reaction `(n,{label}c)`.
const LEVEL_FAMILIES: &[(i32, &str, i32, i32)] = &[
    (51, "n", 1, 40),
    (600, "p", 0, 48),
    (650, "d", 0, 48),
    (700, "t", 0, 48),
    (750, "3He", 0, 48),
    (800, "a", 0, 48),
    (875, "2n", 0, 15),
];

fn build_catalog() -> Vec<(i32, String)> {
    let mut entries: Vec<(i32, String)> = NAMED_REACTIONS
        .iter()
        .map(|&(mt, name)| (mt, name.to_string()))
        .collect();
    for &(first_mt, label, first_level, last_level) in LEVEL_FAMILIES {
        for level in first_level..=last_level {
            entries.push((first_mt + level - first_level, format!("(n,{}{})", label, level)));
        }
        // (n,n) continuum already appears in NAMED_REACTIONS as MT 91
        if label != "n" {
            entries.push((
                first_mt + last_level - first_level + 1,
                format!("(n,{}c)", label),
            ));
        }
    }
    entries.sort_by_key(|(mt, _)| *mt);
    entries
}

/// A static HashMap that maps ENDF MT reaction numbers to their descriptive names
/// following the ENDF style naming convention.
pub static REACTION_NAME: Lazy<HashMap<i32, String>> =
    Lazy::new(|| build_catalog().into_iter().collect());

/// A static HashMap that maps ENDF reaction descriptive names to their MT numbers
/// for reverse lookup functionality. Includes special case for 'fission' -> 18.
pub static REACTION_MT: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let mut map: HashMap<String, i32> = build_catalog()
        .into_iter()
        .map(|(mt, name)| (name, mt))
        .collect();
    map.insert("fission".to_string(), 18);
    map
});

/// Whether `keyword` names a known reaction, either by descriptive name
/// (`"(n,Xt)"`) or by MT number written in decimal (`"205"`).
pub fn is_reaction(keyword: &str) -> bool {
    if REACTION_MT.contains_key(keyword) {
        return true;
    }
    keyword
        .parse::<i32>()
        .map(|mt| REACTION_NAME.contains_key(&mt))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_lookups() {
        assert_eq!(REACTION_MT.get("(n,Xt)"), Some(&205));
        assert_eq!(REACTION_MT.get("heating"), Some(&301));
        assert_eq!(REACTION_MT.get("fission"), Some(&18));
        assert_eq!(REACTION_NAME.get(&2).map(String::as_str), Some("(n,elastic)"));
    }

    #[test]
    fn test_generated_families() {
        assert_eq!(REACTION_NAME.get(&51).map(String::as_str), Some("(n,n1)"));
        assert_eq!(REACTION_NAME.get(&90).map(String::as_str), Some("(n,n40)"));
        assert_eq!(REACTION_NAME.get(&91).map(String::as_str), Some("(n,nc)"));
        assert_eq!(REACTION_NAME.get(&600).map(String::as_str), Some("(n,p0)"));
        assert_eq!(REACTION_NAME.get(&649).map(String::as_str), Some("(n,pc)"));
        assert_eq!(REACTION_NAME.get(&799).map(String::as_str), Some("(n,3Hec)"));
        assert_eq!(REACTION_NAME.get(&849).map(String::as_str), Some("(n,ac)"));
        assert_eq!(REACTION_NAME.get(&875).map(String::as_str), Some("(n,2n0)"));
        assert_eq!(REACTION_NAME.get(&891).map(String::as_str), Some("(n,2nc)"));
    }

    #[test]
    fn test_tables_are_inverse() {
        for (mt, name) in REACTION_NAME.iter() {
            assert_eq!(REACTION_MT.get(name), Some(mt), "mismatch for {}", name);
        }
    }

    #[test]
    fn test_is_reaction() {
        assert!(is_reaction("(n,Xa)"));
        assert!(is_reaction("205"));
        assert!(is_reaction("damage-energy"));
        assert!(!is_reaction("999"));
        assert!(!is_reaction("coucou"));
        assert!(!is_reaction("flux"));
    }
}
