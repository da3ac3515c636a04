//! Built-in US state tables (EIA/DOE/NREL capacity, 2024 consumption estimates,
//! residential retail prices, 2020 census population).

/// Installed capacity in MW, ordered nuclear, coal, gas, hydro, wind, solar, geothermal, biomass.
pub(super) const CAPACITY_MW: &[(&str, [f64; 8])] = &[
    ("AL", [5084.0, 10350.0, 13250.0, 3280.0, 0.0, 589.0, 0.0, 363.0]),
    ("AK", [0.0, 450.0, 2100.0, 1540.0, 62.0, 22.0, 0.0, 50.0]),
    ("AZ", [3937.0, 3940.0, 20500.0, 2718.0, 268.0, 4796.0, 0.0, 113.0]),
    ("AR", [1792.0, 3170.0, 12750.0, 1448.0, 1545.0, 482.0, 0.0, 322.0]),
    ("CA", [2256.0, 0.0, 45600.0, 13650.0, 5972.0, 15472.0, 2732.0, 1327.0]),
    ("CO", [0.0, 3550.0, 9300.0, 2000.0, 4980.0, 1743.0, 0.0, 93.0]),
    ("CT", [2090.0, 0.0, 7950.0, 145.0, 5.0, 765.0, 0.0, 344.0]),
    ("DE", [0.0, 0.0, 3430.0, 0.0, 2.0, 259.0, 0.0, 23.0]),
    ("FL", [3189.0, 5930.0, 53100.0, 38.0, 0.0, 4368.0, 0.0, 1507.0]),
    ("GA", [4330.0, 8690.0, 29600.0, 1932.0, 0.0, 2964.0, 0.0, 1027.0]),
    ("HI", [0.0, 180.0, 1750.0, 38.0, 206.0, 1078.0, 38.0, 126.0]),
    ("ID", [0.0, 35.0, 620.0, 2500.0, 973.0, 101.0, 15.0, 21.0]),
    ("IL", [11582.0, 10690.0, 15100.0, 38.0, 5984.0, 680.0, 0.0, 245.0]),
    ("IN", [0.0, 14860.0, 11200.0, 127.0, 2453.0, 695.0, 0.0, 287.0]),
    ("IA", [615.0, 5630.0, 5750.0, 139.0, 11660.0, 157.0, 0.0, 144.0]),
    ("KS", [1166.0, 2900.0, 8730.0, 2.0, 7016.0, 103.0, 0.0, 38.0]),
    ("KY", [0.0, 12580.0, 8100.0, 853.0, 12.0, 144.0, 0.0, 270.0]),
    ("LA", [2052.0, 2540.0, 33800.0, 192.0, 0.0, 569.0, 0.0, 826.0]),
    ("ME", [0.0, 0.0, 1580.0, 726.0, 933.0, 258.0, 0.0, 767.0]),
    ("MD", [1829.0, 2380.0, 10900.0, 566.0, 191.0, 1563.0, 0.0, 233.0]),
    ("MA", [696.0, 0.0, 13400.0, 536.0, 117.0, 3664.0, 0.0, 599.0]),
    ("MI", [4163.0, 9860.0, 16100.0, 446.0, 2062.0, 538.0, 0.0, 455.0]),
    ("MN", [1730.0, 4510.0, 8970.0, 200.0, 3699.0, 936.0, 0.0, 582.0]),
    ("MS", [1410.0, 2280.0, 18900.0, 0.0, 0.0, 243.0, 0.0, 464.0]),
    ("MO", [1190.0, 8680.0, 10400.0, 564.0, 1143.0, 238.0, 0.0, 125.0]),
    ("MT", [0.0, 2330.0, 680.0, 2685.0, 695.0, 117.0, 0.0, 26.0]),
    ("NE", [1236.0, 2060.0, 4480.0, 73.0, 2379.0, 145.0, 0.0, 38.0]),
    ("NV", [0.0, 1635.0, 11300.0, 1132.0, 152.0, 3264.0, 735.0, 23.0]),
    ("NH", [1245.0, 0.0, 2930.0, 453.0, 185.0, 373.0, 0.0, 503.0]),
    ("NJ", [3479.0, 0.0, 17400.0, 15.0, 11.0, 3819.0, 0.0, 335.0]),
    ("NM", [0.0, 2470.0, 6870.0, 78.0, 1800.0, 953.0, 0.0, 22.0]),
    ("NY", [4125.0, 0.0, 31700.0, 5080.0, 2042.0, 3396.0, 0.0, 586.0]),
    ("NC", [5043.0, 8980.0, 26700.0, 2056.0, 208.0, 6783.0, 0.0, 1021.0]),
    ("ND", [0.0, 3570.0, 1170.0, 593.0, 4427.0, 10.0, 0.0, 12.0]),
    ("OH", [2128.0, 14920.0, 19100.0, 131.0, 738.0, 684.0, 0.0, 258.0]),
    ("OK", [0.0, 5560.0, 29400.0, 874.0, 10690.0, 104.0, 0.0, 154.0]),
    ("OR", [1170.0, 0.0, 6740.0, 11170.0, 3213.0, 345.0, 0.0, 431.0]),
    ("PA", [9515.0, 13200.0, 20900.0, 1759.0, 1450.0, 679.0, 0.0, 782.0]),
    ("RI", [0.0, 0.0, 2700.0, 2.0, 56.0, 278.0, 0.0, 18.0]),
    ("SC", [6479.0, 6650.0, 13000.0, 1670.0, 0.0, 1405.0, 0.0, 595.0]),
    ("SD", [0.0, 590.0, 820.0, 1732.0, 1404.0, 15.0, 0.0, 22.0]),
    ("TN", [7174.0, 6040.0, 12400.0, 3963.0, 29.0, 785.0, 0.0, 416.0]),
    ("TX", [5143.0, 19350.0, 83200.0, 677.0, 35754.0, 7729.0, 0.0, 555.0]),
    ("UT", [0.0, 4120.0, 5740.0, 318.0, 391.0, 1374.0, 38.0, 17.0]),
    ("VT", [0.0, 0.0, 360.0, 449.0, 149.0, 236.0, 0.0, 155.0]),
    ("VA", [3898.0, 2620.0, 22900.0, 802.0, 0.0, 1886.0, 0.0, 884.0]),
    ("WA", [1174.0, 1370.0, 10900.0, 22430.0, 3395.0, 245.0, 0.0, 350.0]),
    ("WV", [0.0, 13040.0, 3600.0, 345.0, 686.0, 53.0, 0.0, 39.0]),
    ("WI", [1135.0, 4920.0, 11100.0, 517.0, 752.0, 304.0, 0.0, 525.0]),
    ("WY", [0.0, 6620.0, 1640.0, 310.0, 1810.0, 48.0, 0.0, 4.0]),
];

/// Annual consumption in MWh.
pub(super) const CONSUMPTION_MWH: &[(&str, f64)] = &[
    ("TX", 478_000_000.0),
    ("CA", 278_000_000.0),
    ("FL", 258_000_000.0),
    ("NY", 156_000_000.0),
    ("PA", 147_000_000.0),
    ("IL", 144_000_000.0),
    ("OH", 142_000_000.0),
    ("GA", 137_000_000.0),
    ("NC", 133_000_000.0),
    ("MI", 108_000_000.0),
    ("VA", 118_000_000.0),
    ("IN", 106_000_000.0),
    ("TN", 99_000_000.0),
    ("AZ", 92_000_000.0),
    ("LA", 89_000_000.0),
    ("WI", 73_000_000.0),
    ("MO", 84_000_000.0),
    ("AL", 87_000_000.0),
    ("SC", 82_000_000.0),
    ("KY", 80_000_000.0),
    ("WA", 94_000_000.0),
    ("OR", 52_000_000.0),
    ("OK", 65_000_000.0),
    ("CO", 58_000_000.0),
    ("CT", 31_000_000.0),
    ("IA", 52_000_000.0),
    ("MS", 49_000_000.0),
    ("AR", 49_000_000.0),
    ("KS", 43_000_000.0),
    ("UT", 32_000_000.0),
    ("NV", 36_000_000.0),
    ("NM", 23_000_000.0),
    ("NE", 30_000_000.0),
    ("WV", 30_000_000.0),
    ("ID", 25_000_000.0),
    ("HI", 10_000_000.0),
    ("ME", 12_000_000.0),
    ("NH", 12_000_000.0),
    ("RI", 8_000_000.0),
    ("MT", 14_000_000.0),
    ("DE", 12_000_000.0),
    ("SD", 11_000_000.0),
    ("ND", 20_000_000.0),
    ("AK", 6_800_000.0),
    ("VT", 6_000_000.0),
    ("WY", 15_000_000.0),
    ("MA", 58_000_000.0),
    ("MD", 66_000_000.0),
    ("MN", 71_000_000.0),
    ("NJ", 82_000_000.0),
];

/// Base retail price in cents per kWh.
pub(super) const BASE_PRICE_CENTS: &[(&str, f64)] = &[
    ("HI", 32.5),
    ("AK", 23.8),
    ("CT", 22.1),
    ("MA", 21.8),
    ("NH", 20.6),
    ("CA", 19.9),
    ("RI", 19.3),
    ("VT", 18.4),
    ("NY", 17.8),
    ("ME", 16.7),
    ("NJ", 16.2),
    ("MD", 13.9),
    ("PA", 13.3),
    ("DE", 12.8),
    ("IL", 12.6),
    ("AZ", 12.4),
    ("NV", 12.1),
    ("MI", 11.9),
    ("WI", 11.7),
    ("MN", 11.5),
    ("OH", 11.3),
    ("GA", 11.2),
    ("FL", 11.1),
    ("NC", 10.9),
    ("SC", 10.8),
    ("TX", 10.7),
    ("VA", 10.6),
    ("TN", 10.5),
    ("IN", 10.3),
    ("MO", 10.2),
    ("KY", 10.0),
    ("AL", 9.8),
    ("MS", 9.7),
    ("LA", 9.5),
    ("AR", 9.4),
    ("IA", 9.3),
    ("KS", 9.2),
    ("OK", 9.1),
    ("NE", 9.0),
    ("SD", 8.9),
    ("ND", 8.8),
    ("MT", 8.7),
    ("WY", 8.6),
    ("UT", 8.5),
    ("CO", 8.4),
    ("NM", 8.3),
    ("ID", 8.2),
    ("OR", 8.1),
    ("WA", 8.0),
    ("WV", 9.6),
];

pub(super) const POPULATION: &[(&str, u64)] = &[
    ("CA", 39_538_223),
    ("TX", 29_145_505),
    ("FL", 21_538_187),
    ("NY", 20_201_249),
    ("PA", 13_002_700),
    ("IL", 12_812_508),
    ("OH", 11_799_448),
    ("GA", 10_711_908),
    ("NC", 10_439_388),
    ("MI", 10_037_261),
    ("NJ", 9_288_994),
    ("VA", 8_631_393),
    ("WA", 7_705_281),
    ("AZ", 7_151_502),
    ("MA", 7_029_917),
    ("TN", 6_910_842),
    ("IN", 6_785_528),
    ("MO", 6_154_913),
    ("MD", 6_177_224),
    ("WI", 5_893_718),
    ("CO", 5_773_714),
    ("MN", 5_706_494),
    ("SC", 5_118_425),
    ("AL", 5_024_279),
    ("LA", 4_657_757),
    ("KY", 4_505_836),
    ("OR", 4_237_256),
    ("OK", 3_959_353),
    ("CT", 3_605_944),
    ("UT", 3_271_616),
    ("IA", 3_190_369),
    ("NV", 3_104_614),
    ("AR", 3_011_524),
    ("MS", 2_961_279),
    ("KS", 2_937_880),
    ("NM", 2_117_522),
    ("NE", 1_961_504),
    ("WV", 1_793_716),
    ("ID", 1_839_106),
    ("HI", 1_455_271),
    ("NH", 1_377_529),
    ("ME", 1_362_359),
    ("RI", 1_097_379),
    ("MT", 1_084_225),
    ("DE", 989_948),
    ("SD", 886_667),
    ("ND", 779_094),
    ("AK", 733_391),
    ("VT", 643_077),
    ("WY", 576_851),
];

pub(super) const STATE_NAMES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];
