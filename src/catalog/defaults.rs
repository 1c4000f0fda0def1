use crate::models::{CatalogItem, CompetitorItem};

/// Name of the collection the built-in catalog is indexed under
pub const DEFAULT_COLLECTION_NAME: &str = "our_products";

/// Built-in internal product catalog
pub fn default_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(
            "Y001",
            "Electrolytic Capacitor 100µF ±10%, 50V, radial, Ø5mm ×11mm",
        ),
        CatalogItem::new(
            "Y002",
            "Electrolytic Capacitor 220µF ±20%, 25V, radial, Ø6.3mm ×11mm",
        ),
        CatalogItem::new("Y003", "Resistor 10kΩ ±1%, 0.25W, axial"),
        CatalogItem::new("Y004", "MOSFET IRF540N N-Channel, 100V, 33A, Rds(on)=0.077Ω"),
        CatalogItem::new("Y005", "Stepper Motor NEMA17, 1.8° step, 45N·cm torque, 2A"),
        CatalogItem::new("Y006", "Microcontroller ATmega328P 8-bit, 32KB Flash, 20MHz"),
        CatalogItem::new("Y007", "Diode 1N4007, 1A, 1000V, DO-41"),
        CatalogItem::new("Y008", "Optocoupler PC817, CTR 50-600%, 5kV isolation"),
        CatalogItem::new("Y009", "Relay 5V SPDT, coil 5V, 10A contact"),
        CatalogItem::new("Y010", "Voltage Regulator LM7805, fixed 5V output, TO-220, ~1A"),
    ]
}

/// Built-in competitor items to match
pub fn default_competitors() -> Vec<CompetitorItem> {
    vec![
        CompetitorItem::new(
            "C101",
            "Electrolytic Capacitor 100µF ±10%, 50V, radial, Ø5×11mm",
        ),
        CompetitorItem::new("C104", "MOSFET IRF540 N-Channel, 100V, 33A, Rds(on)=0.080Ω"),
        CompetitorItem::new(
            "C105",
            "Stepper Motor NEMA17, 1.8° step, 50N·cm torque, 1.7A",
        ),
        CompetitorItem::new("C106", "ATmega328 MCU 8-bit, 32KB Flash, 16MHz"),
        CompetitorItem::new("C108", "Optocoupler PC817C, CTR 50-600%, 5kV isolation"),
        CompetitorItem::new("C110", "LM7805 fixed 5V output regulator TO-220"),
    ]
}
